//! Error types for DocSync operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::types::SyncStats;
use crate::validation::ValidationError;

/// Why a directory sync did not run to completion
#[derive(Debug)]
pub enum SyncError {
	/// Local root is missing or not a directory
	InvalidDirectory { path: PathBuf },

	/// Shutdown was requested; `completed` counts the files handled before stopping
	Interrupted { completed: SyncStats },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::InvalidDirectory { path } => {
				write!(f, "Directory does not exist: {}", path.display())
			}
			SyncError::Interrupted { completed } => {
				write!(f, "Interrupted before completion ({})", completed)
			}
		}
	}
}

impl Error for SyncError {}

/// Manifest persistence and file inspection errors
#[derive(Debug)]
pub enum TrackerError {
	/// Failed to read the manifest file
	LoadFailed { source: Box<dyn Error + Send + Sync> },

	/// Failed to write the manifest file
	SaveFailed { source: Box<dyn Error + Send + Sync> },

	/// Manifest contents are not a valid manifest
	Corrupted { message: String },

	/// Failed to stat or read a tracked file
	Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for TrackerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TrackerError::LoadFailed { source } => write!(f, "Failed to load manifest: {}", source),
			TrackerError::SaveFailed { source } => write!(f, "Failed to save manifest: {}", source),
			TrackerError::Corrupted { message } => write!(f, "Manifest corrupted: {}", message),
			TrackerError::Io { path, source } => {
				write!(f, "Cannot read {}: {}", path.display(), source)
			}
		}
	}
}

impl Error for TrackerError {}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Config or mapping file could not be read
	Read { path: PathBuf, source: io::Error },

	/// Config or mapping file has invalid syntax
	Parse { path: PathBuf, message: String },

	/// No usable folder mappings
	InvalidMapping { message: String },

	/// Settings failed validation
	Invalid(ValidationError),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Read { path, source } => {
				write!(f, "Cannot read {}: {}", path.display(), source)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Cannot parse {}: {}", path.display(), message)
			}
			ConfigError::InvalidMapping { message } => write!(f, "{}", message),
			ConfigError::Invalid(e) => write!(f, "{}", e),
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid(e)
	}
}


// vim: ts=4
