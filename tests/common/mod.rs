//! In-memory document store for driving the sync engine in tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use docsync::remote::{RemoteError, RemoteFile, RemoteResult, RemoteStore, UploadRequest, UploadResponse};
use docsync::tracker::ChangeTracker;
use docsync::utils::ShutdownFlag;
use docsync::uploader::Uploader;
use docsync::SyncEngine;

/// How the mock answers a successful upload
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AckMode {
	/// `{"id": ...}`
	TopLevel,
	/// `{"data": {"id": ...}}`
	Nested,
	/// `{"status": "ok"}`, file visible in later listings
	StatusOnly,
	/// `{"status": "ok"}`, file never shows up
	Lost,
}

#[derive(Debug)]
pub struct Uploaded {
	pub folder_id: String,
	pub name: String,
	pub engine: String,
	pub mime_type: String,
	pub content: Vec<u8>,
}

#[derive(Debug)]
struct State {
	next_id: u64,
	folders: BTreeMap<String, BTreeMap<String, String>>,
	uploads: Vec<Uploaded>,
	deletes: Vec<String>,
	list_calls: usize,
	fail_list: bool,
	fail_upload: BTreeSet<String>,
	fail_delete: BTreeSet<String>,
	ack_mode: AckMode,
	stop_on_upload: Option<ShutdownFlag>,
}

/// Shared handle; clone it before giving one to the engine
#[derive(Clone)]
pub struct MockRemote {
	state: Arc<Mutex<State>>,
}

impl MockRemote {
	pub fn new() -> Self {
		MockRemote {
			state: Arc::new(Mutex::new(State {
				next_id: 1,
				folders: BTreeMap::new(),
				uploads: Vec::new(),
				deletes: Vec::new(),
				list_calls: 0,
				fail_list: false,
				fail_upload: BTreeSet::new(),
				fail_delete: BTreeSet::new(),
				ack_mode: AckMode::TopLevel,
				stop_on_upload: None,
			})),
		}
	}

	/// Put a file straight into a folder, as if uploaded by someone else
	pub fn seed(&self, folder_id: &str, name: &str) -> String {
		let mut state = self.state.lock().unwrap();
		let id = format!("r{}", state.next_id);
		state.next_id += 1;
		state.folders.entry(folder_id.to_string()).or_default().insert(name.to_string(), id.clone());
		id
	}

	/// Remove a file behind the engine's back
	pub fn remove(&self, folder_id: &str, name: &str) -> Option<String> {
		self.state.lock().unwrap().folders.get_mut(folder_id).and_then(|files| files.remove(name))
	}

	pub fn files(&self, folder_id: &str) -> BTreeMap<String, String> {
		self.state.lock().unwrap().folders.get(folder_id).cloned().unwrap_or_default()
	}

	pub fn upload_count(&self) -> usize {
		self.state.lock().unwrap().uploads.len()
	}

	pub fn uploaded_names(&self) -> Vec<String> {
		self.state.lock().unwrap().uploads.iter().map(|u| u.name.clone()).collect()
	}

	pub fn with_uploads<R>(&self, f: impl FnOnce(&[Uploaded]) -> R) -> R {
		f(&self.state.lock().unwrap().uploads)
	}

	pub fn deleted_ids(&self) -> Vec<String> {
		self.state.lock().unwrap().deletes.clone()
	}

	pub fn list_calls(&self) -> usize {
		self.state.lock().unwrap().list_calls
	}

	pub fn set_fail_list(&self, fail: bool) {
		self.state.lock().unwrap().fail_list = fail;
	}

	pub fn fail_upload_of(&self, name: &str) {
		self.state.lock().unwrap().fail_upload.insert(name.to_string());
	}

	pub fn fail_delete_of(&self, id: &str) {
		self.state.lock().unwrap().fail_delete.insert(id.to_string());
	}

	pub fn set_ack_mode(&self, mode: AckMode) {
		self.state.lock().unwrap().ack_mode = mode;
	}

	/// Raise `flag` while the next upload is in flight, like a Ctrl-C mid-run
	pub fn request_shutdown_on_upload(&self, flag: ShutdownFlag) {
		self.state.lock().unwrap().stop_on_upload = Some(flag);
	}
}

#[async_trait]
impl RemoteStore for MockRemote {
	async fn list_files(&self, folder_id: &str) -> RemoteResult<Vec<RemoteFile>> {
		let mut state = self.state.lock().unwrap();
		state.list_calls += 1;
		if state.fail_list {
			return Err(RemoteError::Status { status: 503, body: "unavailable".to_string() });
		}
		Ok(state
			.folders
			.get(folder_id)
			.map(|files| {
				files
					.iter()
					.map(|(name, id)| RemoteFile { id: id.clone(), name: name.clone() })
					.collect()
			})
			.unwrap_or_default())
	}

	async fn upload(&self, request: &UploadRequest<'_>) -> RemoteResult<UploadResponse> {
		let content = fs::read(request.path)?;
		let mut state = self.state.lock().unwrap();
		if state.fail_upload.contains(request.file_name) {
			return Err(RemoteError::Status { status: 500, body: "parse failed".to_string() });
		}

		if let Some(flag) = state.stop_on_upload.take() {
			flag.request();
		}

		let id = format!("r{}", state.next_id);
		state.next_id += 1;
		state.uploads.push(Uploaded {
			folder_id: request.folder_id.to_string(),
			name: request.file_name.to_string(),
			engine: request.engine.as_str().to_string(),
			mime_type: request.mime_type.to_string(),
			content,
		});

		let mode = state.ack_mode;
		if mode != AckMode::Lost {
			state
				.folders
				.entry(request.folder_id.to_string())
				.or_default()
				.insert(request.file_name.to_string(), id.clone());
		}

		Ok(match mode {
			AckMode::TopLevel => UploadResponse::Id(id),
			AckMode::Nested => UploadResponse::NestedId(id),
			AckMode::StatusOnly | AckMode::Lost => {
				UploadResponse::Acknowledged { status: Some("ok".to_string()) }
			}
		})
	}

	async fn delete_files(&self, folder_id: &str, file_ids: &[String]) -> RemoteResult<()> {
		let mut state = self.state.lock().unwrap();
		if file_ids.iter().any(|id| state.fail_delete.contains(id)) {
			return Err(RemoteError::Status { status: 404, body: "no such file".to_string() });
		}
		if let Some(files) = state.folders.get_mut(folder_id) {
			files.retain(|_, id| !file_ids.contains(id));
		}
		state.deletes.extend(file_ids.iter().cloned());
		Ok(())
	}
}

pub fn uploader(remote: &MockRemote) -> Uploader {
	Uploader::new(Arc::new(remote.clone())).with_settle_delay(Duration::ZERO)
}

pub fn engine(remote: &MockRemote, manifest: &Path) -> SyncEngine {
	SyncEngine::new(uploader(remote), ChangeTracker::open(manifest))
}

/// Helper to create a file (and its parent directories) with content
pub fn create_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(&path, content).unwrap();
	path
}

// vim: ts=4
