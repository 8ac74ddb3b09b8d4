use std::path::Path;

use crate::types::ParseEngine;

/// A document as reported by a folder listing
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RemoteFile {
	pub id: String,
	pub name: String,
}

/// Everything needed to send one file to the store
#[derive(Clone, Debug)]
pub struct UploadRequest<'a> {
	pub path: &'a Path,
	pub file_name: &'a str,
	pub folder_id: &'a str,
	pub engine: ParseEngine,
	pub mime_type: &'static str,
}

// vim: ts=4
