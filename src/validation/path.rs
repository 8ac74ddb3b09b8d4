//! Path validation functions

use std::fs;
use std::path::Path;

use super::ValidationError;
use crate::types::DocumentKind;

/// Validate that a sync root exists and is a directory
pub fn validate_directory(path: &Path) -> Result<(), ValidationError> {
	match fs::metadata(path) {
		Ok(meta) if meta.is_dir() => Ok(()),
		Ok(_) => Err(ValidationError::PathError(format!("Not a directory: {}", path.display()))),
		Err(_) => {
			Err(ValidationError::PathError(format!("Directory does not exist: {}", path.display())))
		}
	}
}

/// Validate that a file exists and has a supported document extension
///
/// # Returns
/// The document kind on success
pub fn validate_document(path: &Path) -> Result<DocumentKind, ValidationError> {
	if !path.is_file() {
		return Err(ValidationError::PathError(format!("File does not exist: {}", path.display())));
	}
	DocumentKind::from_path(path).ok_or_else(|| {
		let ext = path
			.extension()
			.map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
			.unwrap_or_default();
		ValidationError::UnsupportedType(ext)
	})
}


// vim: ts=4
