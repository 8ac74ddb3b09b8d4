//! Logging prelude module for convenient access to tracing macros.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Uploaded {}", path.display());
//! warn!("Listing failed, continuing with an empty remote set");
//! ```

pub use tracing::{debug, error, info, info_span, warn};

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with environment filter support.
///
/// Logs at INFO level and above by default, DEBUG with `verbose`. The
/// `RUST_LOG` environment variable takes precedence over both:
///
/// ```bash
/// RUST_LOG=docsync=debug docsync --mapping-file map.json ...
/// RUST_LOG=docsync::uploader=trace docsync ...
/// ```
///
/// With `log_file`, every line is also appended (without colors) to that file.
pub fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
	let default_level = if verbose { "debug" } else { "info" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	let file_layer = match log_file {
		Some(path) => {
			let file = OpenOptions::new()
				.create(true)
				.append(true)
				.open(path)
				.map_err(|e| format!("Cannot open log file {}: {}", path.display(), e))?;
			Some(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.with(file_layer)
		.try_init()?;
	Ok(())
}

// vim: ts=4
