use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Fresh on-disk facts about a local file
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileMetadata {
	pub path: PathBuf,
	pub size: u64,
	pub mtime_ns: u64,
	pub hash: String,
}

/// Manifest entry for one synchronized file
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFile {
	pub remote_id: String,
	pub size: u64,
	pub mtime_ns: u64,
	pub hash: String,
	pub last_synced: u64,
}

/// Server-side processing engine requested for an upload
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseEngine {
	/// Structural parser for paginated office formats
	Ultraparse,
	/// Generic text extraction
	Tika,
}

impl ParseEngine {
	pub fn as_str(&self) -> &'static str {
		match self {
			ParseEngine::Ultraparse => "ultraparse",
			ParseEngine::Tika => "tika",
		}
	}
}

impl fmt::Display for ParseEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The fixed set of document types the remote store accepts
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DocumentKind {
	Pdf,
	Docx,
	Txt,
	Pptx,
	Xlsx,
}

impl DocumentKind {
	/// Classify a path by its extension (case-insensitive)
	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?.to_ascii_lowercase();
		match ext.as_str() {
			"pdf" => Some(DocumentKind::Pdf),
			"docx" => Some(DocumentKind::Docx),
			"txt" => Some(DocumentKind::Txt),
			"pptx" => Some(DocumentKind::Pptx),
			"xlsx" => Some(DocumentKind::Xlsx),
			_ => None,
		}
	}

	pub fn parse_engine(&self) -> ParseEngine {
		match self {
			DocumentKind::Pdf | DocumentKind::Docx | DocumentKind::Pptx => ParseEngine::Ultraparse,
			DocumentKind::Txt | DocumentKind::Xlsx => ParseEngine::Tika,
		}
	}

	pub fn mime_type(&self) -> &'static str {
		match self {
			DocumentKind::Pdf => "application/pdf",
			DocumentKind::Docx => {
				"application/vnd.openxmlformats-officedocument.wordprocessingml.document"
			}
			DocumentKind::Txt => "text/plain",
			DocumentKind::Pptx => {
				"application/vnd.openxmlformats-officedocument.presentationml.presentation"
			}
			DocumentKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
		}
	}
}

/// Per-directory reconciliation counters
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SyncStats {
	pub added: usize,
	pub updated: usize,
	pub deleted: usize,
	pub skipped: usize,
	pub failed: usize,
}

impl SyncStats {
	pub fn merge(&mut self, other: &SyncStats) {
		self.added += other.added;
		self.updated += other.updated;
		self.deleted += other.deleted;
		self.skipped += other.skipped;
		self.failed += other.failed;
	}
}

impl fmt::Display for SyncStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"added={} updated={} deleted={} skipped={} failed={}",
			self.added, self.updated, self.deleted, self.skipped, self.failed
		)
	}
}


// vim: ts=4
