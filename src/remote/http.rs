//! reqwest-backed implementation of the document API

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use serde_json::{json, Value};

use super::error::RemoteError;
use super::response::{parse_listing, UploadResponse};
use super::traits::{RemoteResult, RemoteStore};
use super::types::{RemoteFile, UploadRequest};
use crate::logging::*;

/// Path prefix of every document API endpoint under the base URL
pub const API_PREFIX: &[&str] = &["localmind", "public-upload"];

/// Bearer-authenticated HTTP client for one document API deployment
pub struct HttpRemote {
	client: reqwest::Client,
	base_url: Url,
	api_key: String,
}

impl HttpRemote {
	/// Build a client; `verify_ssl = false` accepts any server certificate
	pub fn new(base_url: &str, api_key: &str, verify_ssl: bool) -> RemoteResult<Self> {
		let base_url = Url::parse(base_url.trim_end_matches('/'))
			.map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", base_url, e)))?;
		if base_url.cannot_be_a_base() {
			return Err(RemoteError::InvalidUrl(base_url.to_string()));
		}
		if !verify_ssl {
			debug!("SSL certificate verification disabled");
		}
		let client = reqwest::Client::builder().danger_accept_invalid_certs(!verify_ssl).build()?;
		Ok(HttpRemote { client, base_url, api_key: api_key.to_string() })
	}

	/// Endpoint URL for the given path segments below the API prefix
	pub fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?
			.pop_if_empty()
			.extend(API_PREFIX)
			.extend(segments);
		Ok(url)
	}

	/// Return the body of a successful response, or the status and body as an error
	async fn read_body(response: reqwest::Response) -> RemoteResult<String> {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		if !status.is_success() {
			return Err(RemoteError::Status { status: status.as_u16(), body });
		}
		Ok(body)
	}
}

#[async_trait]
impl RemoteStore for HttpRemote {
	async fn list_files(&self, folder_id: &str) -> RemoteResult<Vec<RemoteFile>> {
		let url = self.endpoint(&["folders", folder_id, "files"])?;
		let response = self.client.get(url).bearer_auth(&self.api_key).send().await?;
		let body = Self::read_body(response).await?;
		let value: Value = serde_json::from_str(&body)?;
		parse_listing(&value)
	}

	async fn upload(&self, request: &UploadRequest<'_>) -> RemoteResult<UploadResponse> {
		let url = self.endpoint(&["file"])?;
		// Streamed from disk with a known length so the request keeps a Content-Length
		let file = tokio::fs::File::open(request.path).await?;
		let length = file.metadata().await?.len();
		let part = Part::stream_with_length(Body::from(file), length)
			.file_name(request.file_name.to_string())
			.mime_str(request.mime_type)?;
		let form = Form::new().part("file", part);

		let response = self
			.client
			.post(url)
			.query(&[("folder_id", request.folder_id), ("parse_engine", request.engine.as_str())])
			.bearer_auth(&self.api_key)
			.multipart(form)
			.send()
			.await?;
		let body = Self::read_body(response).await?;
		debug!("Upload response for {}: {}", request.file_name, body);

		// A 2xx without a JSON body still means the server took the file
		match serde_json::from_str::<Value>(&body) {
			Ok(value) => Ok(UploadResponse::from_json(&value)),
			Err(_) => Ok(UploadResponse::Acknowledged { status: None }),
		}
	}

	async fn delete_files(&self, folder_id: &str, file_ids: &[String]) -> RemoteResult<()> {
		let url = self.endpoint(&["files"])?;
		let response = self
			.client
			.delete(url)
			.query(&[("folder_id", folder_id)])
			.bearer_auth(&self.api_key)
			.json(&json!({ "file_ids": file_ids }))
			.send()
			.await?;
		Self::read_body(response).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_endpoint_paths() {
		let remote = HttpRemote::new("https://docs.example.com/", "k", true).unwrap();
		assert_eq!(
			remote.endpoint(&["file"]).unwrap().as_str(),
			"https://docs.example.com/localmind/public-upload/file"
		);
		assert_eq!(
			remote.endpoint(&["folders", "f-1", "files"]).unwrap().as_str(),
			"https://docs.example.com/localmind/public-upload/folders/f-1/files"
		);
	}

	#[test]
	fn test_endpoint_keeps_base_path() {
		let remote = HttpRemote::new("http://localhost:8080/api", "k", false).unwrap();
		assert_eq!(
			remote.endpoint(&["files"]).unwrap().as_str(),
			"http://localhost:8080/api/localmind/public-upload/files"
		);
	}

	#[test]
	fn test_folder_id_is_escaped() {
		let remote = HttpRemote::new("http://localhost", "k", true).unwrap();
		let url = remote.endpoint(&["folders", "a/b", "files"]).unwrap();
		assert_eq!(url.as_str(), "http://localhost/localmind/public-upload/folders/a%2Fb/files");
	}

	#[test]
	fn test_rejects_invalid_base_url() {
		assert!(HttpRemote::new("not a url", "k", true).is_err());
		assert!(HttpRemote::new("mailto:someone@example.com", "k", true).is_err());
	}
}

// vim: ts=4
