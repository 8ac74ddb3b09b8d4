//! Core trait for the remote document store

use async_trait::async_trait;

use super::error::RemoteError;
use super::response::UploadResponse;
use super::types::{RemoteFile, UploadRequest};

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Raw, single-attempt operations against one document store
///
/// Implementations report every failure as an error; deciding which
/// failures are tolerable is left to the caller.
#[async_trait]
pub trait RemoteStore: Send + Sync {
	/// List the documents currently in a folder
	async fn list_files(&self, folder_id: &str) -> RemoteResult<Vec<RemoteFile>>;

	/// Upload one local document into a folder
	async fn upload(&self, request: &UploadRequest<'_>) -> RemoteResult<UploadResponse>;

	/// Delete documents from a folder by identifier
	async fn delete_files(&self, folder_id: &str, file_ids: &[String]) -> RemoteResult<()>;
}

// vim: ts=4
