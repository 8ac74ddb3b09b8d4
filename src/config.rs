//! Configuration for DocSync
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (`--config`, TOML or JSON5)
//! 3. Environment variables (DOCSYNC_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)
//!
//! Supported extensions and the extension -> parse engine routing are fixed
//! policy (see [`crate::types::DocumentKind`]) and deliberately not configurable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::*;
use crate::validation::{self, ValidationError, Validator};

pub const ENV_BASE_URL: &str = "DOCSYNC_BASE_URL";
pub const ENV_API_KEY: &str = "DOCSYNC_API_KEY";
pub const ENV_MANIFEST: &str = "DOCSYNC_MANIFEST";

/// Runtime configuration for a sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Base URL of the document API
	pub base_url: String,

	/// Bearer token sent with every request
	pub api_key: String,

	/// Verify server TLS certificates
	pub verify_ssl: bool,

	/// Local root -> remote folder id
	pub mappings: BTreeMap<String, String>,

	/// Where the change tracker's manifest lives
	pub manifest_path: PathBuf,

	/// Append log lines to this file as well as stderr
	pub log_file: Option<PathBuf>,

	/// Debug-level logging
	pub verbose: bool,

	/// Wait before resolving an id-less upload acknowledgement by listing (ms)
	pub upload_settle_ms: u64,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			base_url: String::new(),
			api_key: String::new(),
			verify_ssl: false,
			mappings: BTreeMap::new(),
			manifest_path: default_manifest_path(),
			log_file: None,
			verbose: false,
			upload_settle_ms: 2000,
		}
	}
}

/// `$HOME/.docsync/manifest.json`, or `.docsync/manifest.json` without HOME
pub fn default_manifest_path() -> PathBuf {
	std::env::var("HOME")
		.ok()
		.map(|h| PathBuf::from(h).join(".docsync"))
		.unwrap_or_else(|| PathBuf::from(".docsync"))
		.join("manifest.json")
}

impl Config {
	/// Load a config file; `.toml` files are TOML, anything else JSON5
	pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
		let contents = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		let is_toml = path.extension().map(|e| e.eq_ignore_ascii_case("toml")).unwrap_or(false);

		if is_toml {
			toml::from_str(&contents)
				.map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
		} else {
			json5::from_str(&contents)
				.map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
		}
	}

	/// Override settings from DOCSYNC_* environment variables
	pub fn apply_env(&mut self) {
		self.apply_env_from(|key| std::env::var(key).ok());
	}

	/// Same as [`Config::apply_env`] with an injectable lookup
	pub fn apply_env_from<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(v) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
			self.base_url = v;
		}
		if let Some(v) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
			self.api_key = v;
		}
		if let Some(v) = lookup(ENV_MANIFEST).filter(|v| !v.is_empty()) {
			self.manifest_path = PathBuf::from(v);
		}
	}

	pub fn settle_delay(&self) -> Duration {
		Duration::from_millis(self.upload_settle_ms)
	}
}

impl Validator for Config {
	fn validate(&self) -> Result<(), ValidationError> {
		validation::validate_base_url(&self.base_url)?;
		validation::validate_api_key(&self.api_key)?;
		validation::validate_mappings(&self.mappings)
	}
}

/// Parse a JSON mapping object `{ "local/root": "folder-id", ... }`
///
/// Entries whose value is not a string are logged and skipped.
pub fn parse_mappings(contents: &str, path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
	let value: Value = json5::from_str(contents)
		.map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
	let Value::Object(entries) = value else {
		return Err(ConfigError::Parse {
			path: path.to_path_buf(),
			message: "expected an object of local path -> folder id".to_string(),
		});
	};

	let mut mappings = BTreeMap::new();
	for (local_path, folder_id) in entries {
		match folder_id {
			Value::String(id) => {
				mappings.insert(local_path, id);
			}
			other => error!("Invalid mapping entry: {} -> {}", local_path, other),
		}
	}
	Ok(mappings)
}

/// Load folder mappings from a JSON file
pub fn load_mapping_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
	let contents = fs::read_to_string(path)
		.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
	parse_mappings(&contents, path)
}


// vim: ts=4
