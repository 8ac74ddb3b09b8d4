//! Fault-tolerant document operations on top of a [`RemoteStore`]
//!
//! Every call here makes at most the documented number of remote requests
//! and never propagates transport errors: failures are logged (with the
//! server's response body when there is one) and reported as values the
//! sync engine can count.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::logging::*;
use crate::remote::{RemoteStore, UploadRequest};
use crate::util;
use crate::validation;

/// Wait before the listing that resolves an id-less upload acknowledgement
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Result of [`Uploader::upload_file`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UploadOutcome {
	/// File was sent; the store assigned this identifier
	Uploaded(String),
	/// A document with the same name already exists; nothing was sent
	AlreadyPresent(String),
	/// The store accepted the file but its identifier could not be found
	Unresolved,
	/// Local validation failed (missing file, unsupported type)
	Rejected,
	/// The upload request failed
	Failed,
}

impl UploadOutcome {
	pub fn remote_id(&self) -> Option<&str> {
		match self {
			UploadOutcome::Uploaded(id) | UploadOutcome::AlreadyPresent(id) => Some(id),
			_ => None,
		}
	}
}

/// Upload, delete and list documents in remote folders
pub struct Uploader {
	remote: Arc<dyn RemoteStore>,
	settle_delay: Duration,
}

impl Uploader {
	pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
		Uploader { remote, settle_delay: DEFAULT_SETTLE_DELAY }
	}

	pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
		self.settle_delay = settle_delay;
		self
	}

	/// Map of document name to identifier; any failure yields an empty map
	pub async fn list_remote_files(&self, folder_id: &str) -> BTreeMap<String, String> {
		match self.remote.list_files(folder_id).await {
			Ok(files) => {
				let mut by_name = BTreeMap::new();
				for file in files {
					if let Some(previous) = by_name.insert(file.name.clone(), file.id) {
						debug!("Folder {} lists {} more than once (dropping id {})", folder_id, file.name, previous);
					}
				}
				by_name
			}
			Err(e) => {
				error!("Failed to list files in folder {}: {}", folder_id, e);
				if let Some(body) = e.response_body() {
					error!("Server response: {}", body);
				}
				BTreeMap::new()
			}
		}
	}

	/// Look up one document's identifier by name with a fresh listing
	pub async fn find_remote_id(&self, folder_id: &str, file_name: &str) -> Option<String> {
		self.list_remote_files(folder_id).await.remove(file_name)
	}

	/// Upload a local document unless a same-named one is already in the folder
	pub async fn upload_file(&self, path: &Path, folder_id: &str) -> UploadOutcome {
		let kind = match validation::validate_document(path) {
			Ok(kind) => kind,
			Err(e) => {
				warn!("Skipping {}: {}", path.display(), e);
				return UploadOutcome::Rejected;
			}
		};
		let Some(file_name) = util::file_name_of(path) else {
			return UploadOutcome::Rejected;
		};

		if let Some(id) = self.find_remote_id(folder_id, &file_name).await {
			info!("{} already exists in folder {} (id {}), not uploading", file_name, folder_id, id);
			return UploadOutcome::AlreadyPresent(id);
		}

		let engine = kind.parse_engine();
		info!("Uploading {} with parser engine {}", path.display(), engine);
		let request = UploadRequest {
			path,
			file_name: &file_name,
			folder_id,
			engine,
			mime_type: kind.mime_type(),
		};

		let response = match self.remote.upload(&request).await {
			Ok(response) => response,
			Err(e) => {
				error!("Upload failed for {}: {}", path.display(), e);
				if let Some(body) = e.response_body() {
					error!("Server response: {}", body);
				}
				return UploadOutcome::Failed;
			}
		};

		if let Some(id) = response.remote_id() {
			info!("Uploaded {} (id {})", path.display(), id);
			return UploadOutcome::Uploaded(id.to_string());
		}

		debug!("Upload of {} acknowledged without id ({:?}), resolving by listing", file_name, response);
		if !self.settle_delay.is_zero() {
			tokio::time::sleep(self.settle_delay).await;
		}
		match self.find_remote_id(folder_id, &file_name).await {
			Some(id) => {
				info!("Uploaded {} (id {} resolved from listing)", path.display(), id);
				UploadOutcome::Uploaded(id)
			}
			None => {
				warn!("Upload of {} was acknowledged but no id could be resolved", path.display());
				UploadOutcome::Unresolved
			}
		}
	}

	/// Delete one document; returns whether the store confirmed it
	pub async fn delete_file(&self, remote_id: &str, folder_id: &str) -> bool {
		match self.remote.delete_files(folder_id, &[remote_id.to_string()]).await {
			Ok(()) => {
				debug!("Deleted remote file {} from folder {}", remote_id, folder_id);
				true
			}
			Err(e) => {
				error!("Delete failed for remote file {}: {}", remote_id, e);
				if let Some(body) = e.response_body() {
					error!("Server response: {}", body);
				}
				false
			}
		}
	}
}

// vim: ts=4
