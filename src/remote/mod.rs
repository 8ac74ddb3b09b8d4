//! Remote document store abstraction
//!
//! The sync engine talks to the document API only through the
//! [`RemoteStore`] trait, so the reconciliation logic can be driven by the
//! reqwest-backed [`HttpRemote`] in production and by in-memory doubles in
//! tests.
//!
//! # Example Usage
//!
//! ```ignore
//! use docsync::remote::{HttpRemote, RemoteStore};
//!
//! let remote = HttpRemote::new("https://docs.example.com", "secret", true)?;
//! for file in remote.list_files("folder-42").await? {
//!     println!("{} -> {}", file.name, file.id);
//! }
//! ```

pub mod error;
pub mod http;
pub mod response;
pub mod traits;
pub mod types;

pub use error::RemoteError;
pub use http::HttpRemote;
pub use response::UploadResponse;
pub use traits::{RemoteResult, RemoteStore};
pub use types::{RemoteFile, UploadRequest};

// vim: ts=4
