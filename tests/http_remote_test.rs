//! HTTP client tests against a one-shot local server

use std::fs;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use docsync::remote::{HttpRemote, RemoteError, RemoteStore, UploadRequest, UploadResponse};
use docsync::types::ParseEngine;

fn header_end(buf: &[u8]) -> Option<usize> {
	buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> Option<usize> {
	head.lines()
		.find_map(|line| line.strip_prefix("content-length:"))
		.and_then(|v| v.trim().parse().ok())
}

/// Read one full request (headers plus body) off the socket
async fn read_request(stream: &mut TcpStream) -> String {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 8192];
	loop {
		let n = stream.read(&mut chunk).await.unwrap();
		if n == 0 {
			break;
		}
		buf.extend_from_slice(&chunk[..n]);
		if let Some(end) = header_end(&buf) {
			let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
			match content_length(&head) {
				Some(len) if buf.len() >= end + 4 + len => break,
				Some(_) => continue,
				None if head.contains("transfer-encoding: chunked") => {
					if buf.ends_with(b"0\r\n\r\n") {
						break;
					}
				}
				None => break,
			}
		}
	}
	String::from_utf8_lossy(&buf).to_string()
}

/// Serve a single request with the given status line and body; yields the raw request
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let base_url = format!("http://{}", listener.local_addr().unwrap());
	let handle = tokio::spawn(async move {
		let (mut stream, _) = listener.accept().await.unwrap();
		let request = read_request(&mut stream).await;
		let response = format!(
			"HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
			status,
			body.len(),
			body
		);
		stream.write_all(response.as_bytes()).await.unwrap();
		stream.shutdown().await.unwrap();
		request
	});
	(base_url, handle)
}

#[tokio::test]
async fn test_upload_streams_file_with_length() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("big.pdf");
	let content = "0123456789abcdef".repeat(16 * 1024);
	fs::write(&path, &content).unwrap();

	let (base_url, server) = serve_once("200 OK", r#"{"data": {"id": 42}}"#).await;
	let remote = HttpRemote::new(&base_url, "secret", true).unwrap();
	let request = UploadRequest {
		path: &path,
		file_name: "big.pdf",
		folder_id: "f-1",
		engine: ParseEngine::Ultraparse,
		mime_type: "application/pdf",
	};

	let response = remote.upload(&request).await.unwrap();
	assert_eq!(response, UploadResponse::NestedId("42".to_string()));

	let raw = server.await.unwrap();
	let lower = raw.to_lowercase();
	assert!(raw.starts_with("POST /localmind/public-upload/file?folder_id=f-1&parse_engine=ultraparse "));
	assert!(lower.contains("authorization: bearer secret"));
	assert!(lower.contains("content-length:"), "body length is announced up front");
	assert!(!lower.contains("transfer-encoding: chunked"));
	assert!(raw.contains("filename=\"big.pdf\""));
	assert!(lower.contains("content-type: application/pdf"));
	assert!(raw.contains(&content));
}

#[tokio::test]
async fn test_upload_of_missing_file_is_io_error() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("gone.pdf");
	let remote = HttpRemote::new("http://127.0.0.1:9", "k", true).unwrap();
	let request = UploadRequest {
		path: &path,
		file_name: "gone.pdf",
		folder_id: "f-1",
		engine: ParseEngine::Ultraparse,
		mime_type: "application/pdf",
	};

	assert!(matches!(remote.upload(&request).await, Err(RemoteError::Io(_))));
}

#[tokio::test]
async fn test_status_error_keeps_body() {
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("notes.txt");
	fs::write(&path, "notes").unwrap();

	let (base_url, server) = serve_once("500 Internal Server Error", "parser crashed").await;
	let remote = HttpRemote::new(&base_url, "k", true).unwrap();
	let request = UploadRequest {
		path: &path,
		file_name: "notes.txt",
		folder_id: "f-2",
		engine: ParseEngine::Tika,
		mime_type: "text/plain",
	};

	match remote.upload(&request).await {
		Err(RemoteError::Status { status, body }) => {
			assert_eq!(status, 500);
			assert_eq!(body, "parser crashed");
		}
		other => panic!("expected status error, got {:?}", other),
	}
	server.await.unwrap();
}

#[tokio::test]
async fn test_list_and_delete_requests() {
	let (base_url, server) =
		serve_once("200 OK", r#"{"data": [{"id": "a1", "name": "x.pdf"}, {"id": 7}]}"#).await;
	let remote = HttpRemote::new(&base_url, "k", true).unwrap();
	let files = remote.list_files("f-3").await.unwrap();
	assert_eq!(files.len(), 1);
	assert_eq!(files[0].id, "a1");
	assert_eq!(files[0].name, "x.pdf");
	let raw = server.await.unwrap();
	assert!(raw.starts_with("GET /localmind/public-upload/folders/f-3/files "));

	let (base_url, server) = serve_once("200 OK", r#"{"status": "deleted"}"#).await;
	let remote = HttpRemote::new(&base_url, "k", true).unwrap();
	remote.delete_files("f-3", &["a1".to_string()]).await.unwrap();
	let raw = server.await.unwrap();
	assert!(raw.starts_with("DELETE /localmind/public-upload/files?folder_id=f-3 "));
	assert!(raw.contains(r#"{"file_ids":["a1"]}"#));
}

// vim: ts=4
