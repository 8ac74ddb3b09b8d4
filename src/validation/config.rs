//! Configuration validation functions

use std::collections::BTreeMap;

use super::ValidationError;

/// Validate the API base URL
pub fn validate_base_url(base_url: &str) -> Result<(), ValidationError> {
	if base_url.trim().is_empty() {
		return Err(ValidationError::ConfigError("Base URL is required".to_string()));
	}
	if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
		return Err(ValidationError::ConfigError(format!(
			"Base URL must start with http:// or https://, got {}",
			base_url
		)));
	}
	Ok(())
}

/// Validate the bearer token
pub fn validate_api_key(api_key: &str) -> Result<(), ValidationError> {
	if api_key.trim().is_empty() {
		return Err(ValidationError::ConfigError("API key is required".to_string()));
	}
	Ok(())
}

/// Validate folder mappings (local root -> remote folder id)
pub fn validate_mappings(mappings: &BTreeMap<String, String>) -> Result<(), ValidationError> {
	if mappings.is_empty() {
		return Err(ValidationError::ConfigError("No folder mappings provided".to_string()));
	}
	for (root, folder_id) in mappings {
		if root.trim().is_empty() {
			return Err(ValidationError::ConfigError("Mapping with empty local path".to_string()));
		}
		if folder_id.trim().is_empty() {
			return Err(ValidationError::ConfigError(format!(
				"Mapping for {} has an empty folder id",
				root
			)));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_base_url() {
		assert!(validate_base_url("https://api.example.com").is_ok());
		assert!(validate_base_url("http://localhost:8080").is_ok());
		assert!(validate_base_url("").unwrap_err().to_string().contains("required"));
		assert!(validate_base_url("ftp://x").unwrap_err().to_string().contains("http://"));
	}

	#[test]
	fn test_validate_api_key() {
		assert!(validate_api_key("secret").is_ok());
		assert!(validate_api_key("  ").is_err());
	}

	#[test]
	fn test_validate_mappings() {
		let mut mappings = BTreeMap::new();
		assert!(validate_mappings(&mappings).unwrap_err().to_string().contains("No folder mappings"));

		mappings.insert("/docs".to_string(), "f-1".to_string());
		assert!(validate_mappings(&mappings).is_ok());

		mappings.insert("/other".to_string(), "".to_string());
		assert!(validate_mappings(&mappings).unwrap_err().to_string().contains("/other"));
	}
}

// vim: ts=4
