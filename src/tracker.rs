//! Change tracker backed by a JSON manifest
//!
//! Remembers, per local root, which remote document each local file was
//! uploaded as, together with the size, mtime and content hash it had at
//! that moment. Change detection is two-tier: a size or mtime difference
//! proves a change without hashing; when both match, the stored hash is
//! compared against the fresh one to catch mtime-preserving edits.
//!
//! Every mutation rewrites the whole manifest through a temp file + rename.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TrackerError;
use crate::logging::*;
use crate::types::{FileMetadata, TrackedFile};
use crate::util;

/// Persisted mapping: local root -> local path -> entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
	pub roots: BTreeMap<String, BTreeMap<String, TrackedFile>>,
}

impl Manifest {
	/// Parse a manifest from its serialized form
	pub fn from_json(contents: &str) -> Result<Self, TrackerError> {
		serde_json::from_str(contents).map_err(|e| TrackerError::Corrupted {
			message: format!("Failed to parse manifest JSON: {}", e),
		})
	}

	/// Number of entries across all roots
	pub fn len(&self) -> usize {
		self.roots.values().map(|files| files.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn key_of(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

/// Local sync bookkeeping for every configured root
pub struct ChangeTracker {
	manifest_path: PathBuf,
	manifest: Manifest,
}

impl ChangeTracker {
	/// Load the manifest, starting empty when it is absent or unreadable
	pub fn open(manifest_path: &Path) -> Self {
		let manifest = match Self::load(manifest_path) {
			Ok(Some(manifest)) => {
				debug!(
					"Loaded manifest {} with {} entries",
					manifest_path.display(),
					manifest.len()
				);
				manifest
			}
			Ok(None) => {
				info!("No manifest at {}, starting fresh", manifest_path.display());
				Manifest::default()
			}
			Err(e) => {
				warn!("{} ({}); tracking starts empty", e, manifest_path.display());
				Manifest::default()
			}
		};

		ChangeTracker { manifest_path: manifest_path.to_path_buf(), manifest }
	}

	fn load(manifest_path: &Path) -> Result<Option<Manifest>, TrackerError> {
		if !manifest_path.exists() {
			return Ok(None);
		}
		let contents = fs::read_to_string(manifest_path)
			.map_err(|e| TrackerError::LoadFailed { source: Box::new(e) })?;
		Manifest::from_json(&contents).map(Some)
	}

	/// Write the whole manifest atomically (temp file in the same directory, then rename)
	pub fn save(&self) -> Result<(), TrackerError> {
		let parent = match self.manifest_path.parent() {
			Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
			_ => PathBuf::from("."),
		};
		fs::create_dir_all(&parent).map_err(|e| TrackerError::SaveFailed { source: Box::new(e) })?;

		let json = serde_json::to_string_pretty(&self.manifest)
			.map_err(|e| TrackerError::SaveFailed { source: Box::new(e) })?;

		let file_name = self
			.manifest_path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_else(|| "manifest.json".to_string());
		let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

		if let Err(e) = fs::write(&tmp_path, json) {
			let _ = fs::remove_file(&tmp_path);
			return Err(TrackerError::SaveFailed { source: Box::new(e) });
		}
		if let Err(e) = fs::rename(&tmp_path, &self.manifest_path) {
			let _ = fs::remove_file(&tmp_path);
			return Err(TrackerError::SaveFailed { source: Box::new(e) });
		}
		Ok(())
	}

	pub fn manifest(&self) -> &Manifest {
		&self.manifest
	}

	pub fn manifest_path(&self) -> &Path {
		&self.manifest_path
	}

	/// Stat and hash a local file
	pub fn metadata(path: &Path) -> Result<FileMetadata, TrackerError> {
		let io_err = |source| TrackerError::Io { path: path.to_path_buf(), source };
		let meta = fs::metadata(path).map_err(io_err)?;
		let mtime_ns = util::mtime_ns(&meta).map_err(io_err)?;
		let hash = Self::content_hash(path)?;
		Ok(FileMetadata { path: path.to_path_buf(), size: meta.len(), mtime_ns, hash })
	}

	/// Streaming content digest of a local file
	pub fn content_hash(path: &Path) -> Result<String, TrackerError> {
		util::content_hash(path).map_err(|source| TrackerError::Io { path: path.to_path_buf(), source })
	}

	/// Tracked entry for a path under a root, if any
	pub fn entry(&self, root: &Path, path: &Path) -> Option<&TrackedFile> {
		self.manifest.roots.get(&key_of(root))?.get(&key_of(path))
	}

	/// Whether a file differs from what was last synchronized
	pub fn is_changed(&self, root: &Path, path: &Path, fresh: &FileMetadata) -> bool {
		let Some(tracked) = self.entry(root, path) else {
			return true;
		};
		if tracked.size != fresh.size || tracked.mtime_ns != fresh.mtime_ns {
			return true;
		}
		tracked.hash != fresh.hash
	}

	/// Upsert the entry for a path and persist
	pub fn record_sync(
		&mut self,
		root: &Path,
		path: &Path,
		remote_id: &str,
		metadata: &FileMetadata,
	) -> Result<(), TrackerError> {
		let entry = TrackedFile {
			remote_id: remote_id.to_string(),
			size: metadata.size,
			mtime_ns: metadata.mtime_ns,
			hash: metadata.hash.clone(),
			last_synced: util::now_secs(),
		};
		self.manifest.roots.entry(key_of(root)).or_default().insert(key_of(path), entry);
		self.save()
	}

	/// Remove the entry for a path if present and persist; returns whether anything was removed
	pub fn forget(&mut self, root: &Path, path: &Path) -> Result<bool, TrackerError> {
		let root_key = key_of(root);
		let removed = match self.manifest.roots.get_mut(&root_key) {
			Some(files) => {
				let removed = files.remove(&key_of(path)).is_some();
				if files.is_empty() {
					self.manifest.roots.remove(&root_key);
				}
				removed
			}
			None => false,
		};
		if removed {
			self.save()?;
		}
		Ok(removed)
	}

	/// All paths tracked under a root
	pub fn tracked_paths(&self, root: &Path) -> BTreeSet<PathBuf> {
		self.manifest
			.roots
			.get(&key_of(root))
			.map(|files| files.keys().map(PathBuf::from).collect())
			.unwrap_or_default()
	}

	/// Remote identifier recorded for a path
	pub fn remote_id_of(&self, root: &Path, path: &Path) -> Option<&str> {
		self.entry(root, path).map(|e| e.remote_id.as_str())
	}
}


// vim: ts=4
