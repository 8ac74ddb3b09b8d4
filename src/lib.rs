//! # DocSync - Directory Synchronizer for Document Stores
//!
//! DocSync mirrors local directory trees into folders of a remote document
//! API. New files are uploaded, changed files replaced, and remote files
//! whose local counterpart vanished are deleted. A local manifest remembers
//! what was synchronized so unchanged files cost no network traffic.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docsync::remote::HttpRemote;
//! use docsync::sync::SyncEngine;
//! use docsync::tracker::ChangeTracker;
//! use docsync::uploader::Uploader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let remote = HttpRemote::new("https://docs.example.com", "secret", true)?;
//!     let tracker = ChangeTracker::open("manifest.json".as_ref());
//!     let mut engine = SyncEngine::new(Uploader::new(Arc::new(remote)), tracker);
//!     let stats = engine.sync_directory("./reports".as_ref(), "folder-42").await?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod sync;
pub mod tracker;
pub mod types;
pub mod uploader;
pub mod util;
pub mod utils;
pub mod validation;

// Re-export commonly used types and functions
pub use config::Config;
pub use error::{ConfigError, SyncError, TrackerError};
pub use remote::{RemoteError, RemoteStore};
pub use sync::{SyncEngine, SyncReport};
pub use tracker::ChangeTracker;
pub use types::{FileMetadata, SyncStats, TrackedFile};

// vim: ts=4
