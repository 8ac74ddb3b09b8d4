//! Directory reconciliation against remote document folders
//!
//! One pass per mapping: list the remote folder once, walk the local tree
//! once, split filenames into new / existing / remote-only, then converge
//! each bucket in turn, one file at a time. Filenames are the join key
//! between the two sides; manifest entries are keyed by full local path.
//!
//! ```ignore
//! use docsync::sync::SyncEngine;
//!
//! let mut engine = SyncEngine::new(uploader, tracker);
//! let stats = engine.sync_directory(Path::new("/srv/docs"), "folder-42").await?;
//! println!("{}", stats);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Instrument;

use crate::error::SyncError;
use crate::logging::*;
use crate::tracker::ChangeTracker;
use crate::types::{DocumentKind, FileMetadata, SyncStats};
use crate::uploader::{UploadOutcome, Uploader};
use crate::util;
use crate::utils::ShutdownFlag;
use crate::validation;

/// Result of syncing one mapping
#[derive(Debug)]
pub struct DirectoryOutcome {
	pub root: PathBuf,
	pub folder_id: String,
	pub result: Result<SyncStats, SyncError>,
}

/// Result of syncing every mapping
#[derive(Debug, Default)]
pub struct SyncReport {
	pub outcomes: Vec<DirectoryOutcome>,
	pub totals: SyncStats,
	/// Shutdown stopped the run before every mapping was fully reconciled
	pub interrupted: bool,
}

impl SyncReport {
	/// True when every directory synced to completion and no file failed
	pub fn is_clean(&self) -> bool {
		!self.interrupted
			&& self.outcomes.iter().all(|o| matches!(&o.result, Ok(stats) if stats.failed == 0))
	}
}

/// Collect supported documents below `root`, keyed by filename
///
/// Entries are visited in sorted path order; when two files share a
/// basename the later one wins and a warning is logged.
pub fn collect_local_files(root: &Path) -> BTreeMap<String, PathBuf> {
	fn scan_dir(dir: &Path, files: &mut BTreeMap<String, PathBuf>) {
		let entries = match fs::read_dir(dir) {
			Ok(e) => e,
			Err(e) => {
				warn!("Cannot read directory {}: {}", dir.display(), e);
				return;
			}
		};

		let mut paths: Vec<PathBuf> = entries
			.filter_map(|entry| match entry {
				Ok(entry) => Some(entry.path()),
				Err(e) => {
					debug!("Error reading directory entry in {}: {}", dir.display(), e);
					None
				}
			})
			.collect();
		paths.sort();

		for path in paths {
			let metadata = match fs::symlink_metadata(&path) {
				Ok(m) => m,
				Err(e) => {
					warn!("Cannot access {}: {}", path.display(), e);
					continue;
				}
			};

			if metadata.is_dir() {
				scan_dir(&path, files);
			} else if metadata.is_file() && DocumentKind::from_path(&path).is_some() {
				let Some(name) = util::file_name_of(&path) else {
					continue;
				};
				if let Some(previous) = files.insert(name.clone(), path.clone()) {
					warn!(
						"Filename collision on {}: {} replaces {}",
						name,
						path.display(),
						previous.display()
					);
				}
			}
		}
	}

	let mut files = BTreeMap::new();
	scan_dir(root, &mut files);
	files
}

/// Drives uploads, deletes and tracker updates for folder mappings
pub struct SyncEngine {
	uploader: Uploader,
	tracker: ChangeTracker,
	shutdown: ShutdownFlag,
}

impl SyncEngine {
	pub fn new(uploader: Uploader, tracker: ChangeTracker) -> Self {
		SyncEngine { uploader, tracker, shutdown: ShutdownFlag::new() }
	}

	/// Stop between files once this flag is raised
	pub fn with_shutdown(mut self, shutdown: ShutdownFlag) -> Self {
		self.shutdown = shutdown;
		self
	}

	pub fn tracker(&self) -> &ChangeTracker {
		&self.tracker
	}

	/// Sync every mapping in key order; one directory's failure never stops the others
	pub async fn sync_all(&mut self, mappings: &BTreeMap<String, String>) -> SyncReport {
		let mut report = SyncReport::default();

		for (root, folder_id) in mappings {
			if self.shutdown.is_requested() {
				warn!("Interrupted, skipping remaining directories");
				report.interrupted = true;
				break;
			}

			let root = PathBuf::from(root);
			let result = self.sync_directory(&root, folder_id).await;
			match &result {
				Ok(stats) => {
					info!("Directory {} -> folder {}: {}", root.display(), folder_id, stats);
					report.totals.merge(stats);
				}
				Err(SyncError::Interrupted { completed }) => {
					warn!(
						"Directory {} -> folder {}: interrupted ({})",
						root.display(),
						folder_id,
						completed
					);
					report.totals.merge(completed);
					report.interrupted = true;
				}
				Err(e) => error!("Directory {} -> folder {}: {}", root.display(), folder_id, e),
			}
			report.outcomes.push(DirectoryOutcome {
				root,
				folder_id: folder_id.clone(),
				result,
			});
		}

		report
	}

	/// Reconcile one local root with one remote folder
	///
	/// Fails with [`SyncError::Interrupted`] when shutdown is requested part
	/// way; files handled until then stay recorded in the manifest.
	pub async fn sync_directory(
		&mut self,
		local_root: &Path,
		folder_id: &str,
	) -> Result<SyncStats, SyncError> {
		let span = info_span!("sync", root = %local_root.display(), folder = folder_id);
		self.reconcile(local_root, folder_id).instrument(span).await
	}

	async fn reconcile(&mut self, root: &Path, folder_id: &str) -> Result<SyncStats, SyncError> {
		if let Err(e) = validation::validate_directory(root) {
			error!("{}", e);
			return Err(SyncError::InvalidDirectory { path: root.to_path_buf() });
		}
		info!("Processing directory {} with folder ID {}", root.display(), folder_id);

		let remote = self.uploader.list_remote_files(folder_id).await;
		let local = collect_local_files(root);

		let new: Vec<&String> = local.keys().filter(|name| !remote.contains_key(*name)).collect();
		let existing: Vec<&String> = local.keys().filter(|name| remote.contains_key(*name)).collect();
		let gone: Vec<&String> = remote.keys().filter(|name| !local.contains_key(*name)).collect();
		debug!(
			"{} local, {} remote: {} new, {} existing, {} remote-only",
			local.len(),
			remote.len(),
			new.len(),
			existing.len(),
			gone.len()
		);

		let mut stats = SyncStats::default();

		for name in new {
			if self.interrupted() {
				return Err(SyncError::Interrupted { completed: stats });
			}
			self.process_new(root, folder_id, name, &local[name], &mut stats).await;
		}

		for name in existing {
			if self.interrupted() {
				return Err(SyncError::Interrupted { completed: stats });
			}
			self.process_existing(root, folder_id, &local[name], &remote[name], &mut stats).await;
		}

		for name in gone {
			if self.interrupted() {
				return Err(SyncError::Interrupted { completed: stats });
			}
			self.process_gone(root, folder_id, name, &remote[name], &mut stats).await;
		}

		self.prune_stale(root, &local);
		info!("Completed {}: {}", root.display(), stats);
		Ok(stats)
	}

	fn interrupted(&self) -> bool {
		if self.shutdown.is_requested() {
			warn!("Interrupted, leaving remaining files for the next run");
			return true;
		}
		false
	}

	/// Forget tracked paths under `root` that are no longer synced local files
	fn prune_stale(&mut self, root: &Path, local: &BTreeMap<String, PathBuf>) {
		let current: BTreeSet<&PathBuf> = local.values().collect();
		let stale: Vec<PathBuf> = self
			.tracker
			.tracked_paths(root)
			.into_iter()
			.filter(|path| !current.contains(path))
			.collect();
		for path in stale {
			debug!("Dropping tracking entry for {}, no longer synced", path.display());
			self.forget(root, &path);
		}
	}

	fn local_metadata(path: &Path) -> Option<FileMetadata> {
		match ChangeTracker::metadata(path) {
			Ok(metadata) => Some(metadata),
			Err(e) => {
				error!("{}", e);
				None
			}
		}
	}

	/// Upload and turn the outcome into an id, retrying the lookup once for id-less acks
	async fn upload_resolved(&self, path: &Path, folder_id: &str, name: &str) -> Option<String> {
		match self.uploader.upload_file(path, folder_id).await {
			UploadOutcome::Uploaded(id) | UploadOutcome::AlreadyPresent(id) => Some(id),
			UploadOutcome::Unresolved => {
				let id = self.uploader.find_remote_id(folder_id, name).await;
				if id.is_none() {
					warn!("{} may exist remotely without a known id", name);
				}
				id
			}
			UploadOutcome::Rejected | UploadOutcome::Failed => None,
		}
	}

	fn record(&mut self, root: &Path, path: &Path, remote_id: &str, metadata: &FileMetadata) {
		if let Err(e) = self.tracker.record_sync(root, path, remote_id, metadata) {
			warn!("Tracking for {} kept in memory only: {}", path.display(), e);
		}
	}

	fn forget(&mut self, root: &Path, path: &Path) {
		if let Err(e) = self.tracker.forget(root, path) {
			warn!("Forgetting {} was not persisted: {}", path.display(), e);
		}
	}

	async fn process_new(
		&mut self,
		root: &Path,
		folder_id: &str,
		name: &str,
		path: &Path,
		stats: &mut SyncStats,
	) {
		let Some(metadata) = Self::local_metadata(path) else {
			stats.failed += 1;
			return;
		};

		match self.upload_resolved(path, folder_id, name).await {
			Some(id) => {
				self.record(root, path, &id, &metadata);
				stats.added += 1;
			}
			None => stats.failed += 1,
		}
	}

	async fn process_existing(
		&mut self,
		root: &Path,
		folder_id: &str,
		path: &Path,
		observed_id: &str,
		stats: &mut SyncStats,
	) {
		let Some(metadata) = Self::local_metadata(path) else {
			stats.failed += 1;
			return;
		};

		let Some(tracked_id) = self.tracker.remote_id_of(root, path).map(str::to_string) else {
			info!("Adopting existing remote file {} for {}", observed_id, path.display());
			self.record(root, path, observed_id, &metadata);
			stats.skipped += 1;
			return;
		};

		if !self.tracker.is_changed(root, path, &metadata) {
			if tracked_id != observed_id {
				debug!(
					"Remote id of {} changed from {} to {}",
					path.display(),
					tracked_id,
					observed_id
				);
				self.record(root, path, observed_id, &metadata);
			}
			stats.skipped += 1;
			return;
		}

		info!("{} changed, replacing remote copy {}", path.display(), observed_id);
		if !self.uploader.delete_file(observed_id, folder_id).await {
			stats.failed += 1;
			return;
		}

		let name = util::file_name_of(path).unwrap_or_default();
		match self.upload_resolved(path, folder_id, &name).await {
			Some(id) => {
				self.record(root, path, &id, &metadata);
				stats.updated += 1;
			}
			None => {
				// Remote copy is gone; the next run sees this file as new
				self.forget(root, path);
				stats.failed += 1;
			}
		}
	}

	async fn process_gone(
		&mut self,
		root: &Path,
		folder_id: &str,
		name: &str,
		remote_id: &str,
		stats: &mut SyncStats,
	) {
		info!("{} no longer exists locally, deleting remote file {}", name, remote_id);
		if !self.uploader.delete_file(remote_id, folder_id).await {
			stats.failed += 1;
			return;
		}

		let stale: Vec<PathBuf> = self
			.tracker
			.tracked_paths(root)
			.into_iter()
			.filter(|p| util::file_name_of(p).as_deref() == Some(name))
			.collect();
		for path in stale {
			self.forget(root, &path);
		}
		stats.deleted += 1;
	}
}


// vim: ts=4
