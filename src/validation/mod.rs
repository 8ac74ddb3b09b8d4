//! Centralized validation for DocSync
//!
//! - Configuration validation (base URL, credentials, folder mappings)
//! - Path validation (sync roots, uploadable documents)

use std::error::Error;
use std::fmt;

pub mod config;
pub mod path;

pub use config::*;
pub use path::*;

/// Generic validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// Invalid configuration
	ConfigError(String),
	/// Invalid path
	PathError(String),
	/// File type outside the supported set
	UnsupportedType(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
			ValidationError::PathError(msg) => write!(f, "Path validation error: {}", msg),
			ValidationError::UnsupportedType(ext) => write!(f, "Unsupported file type: {}", ext),
		}
	}
}

impl Error for ValidationError {}

/// Trait for validatable types
pub trait Validator {
	/// Returns Ok(()) if valid, Err(ValidationError) if invalid
	fn validate(&self) -> Result<(), ValidationError>;
}


// vim: ts=4
