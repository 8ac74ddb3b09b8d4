//! Interpretation of document API response bodies
//!
//! The upload endpoint is inconsistent about where it puts the new
//! document's identifier. All known shapes are folded into
//! [`UploadResponse`] by a single parser so the upload path never sniffs
//! JSON itself.

use serde_json::Value;

use super::error::RemoteError;
use super::traits::RemoteResult;
use super::types::RemoteFile;

/// Outcome reported by the upload endpoint
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UploadResponse {
	/// `{"id": ...}`
	Id(String),
	/// `{"data": {"id": ...}}`
	NestedId(String),
	/// Accepted without an identifier, e.g. `{"status": "queued"}`
	Acknowledged { status: Option<String> },
}

impl UploadResponse {
	pub fn from_json(body: &Value) -> Self {
		if let Some(id) = body.get("id").and_then(id_from_value) {
			return UploadResponse::Id(id);
		}
		if let Some(id) = body.get("data").and_then(|d| d.get("id")).and_then(id_from_value) {
			return UploadResponse::NestedId(id);
		}
		let status = body.get("status").map(|s| match s {
			Value::String(s) => s.clone(),
			other => other.to_string(),
		});
		UploadResponse::Acknowledged { status }
	}

	/// Identifier carried by the response, if the server sent one
	pub fn remote_id(&self) -> Option<&str> {
		match self {
			UploadResponse::Id(id) | UploadResponse::NestedId(id) => Some(id),
			UploadResponse::Acknowledged { .. } => None,
		}
	}
}

/// Identifiers arrive as strings or numbers; both become strings
pub fn id_from_value(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Parse a folder listing body of the form `{"data": [{"id", "name"}, ...]}`
///
/// Entries lacking an id or name are skipped.
pub fn parse_listing(body: &Value) -> RemoteResult<Vec<RemoteFile>> {
	let entries = body
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| RemoteError::InvalidResponse("listing has no data array".to_string()))?;

	Ok(entries
		.iter()
		.filter_map(|entry| {
			let id = entry.get("id").and_then(id_from_value)?;
			let name = entry.get("name").and_then(Value::as_str)?.to_string();
			Some(RemoteFile { id, name })
		})
		.collect())
}


// vim: ts=4
