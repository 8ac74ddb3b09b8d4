//! Remote API error types

use std::fmt;
use std::io;

/// Error from a single remote API call
#[derive(Debug)]
pub enum RemoteError {
	/// Connection, TLS or protocol-level failure
	Transport(reqwest::Error),
	/// Server answered with a non-success status
	Status { status: u16, body: String },
	/// Server answered with a body we cannot interpret
	InvalidResponse(String),
	/// Base URL or endpoint could not be built
	InvalidUrl(String),
	/// Local file could not be read for upload
	Io(io::Error),
}

impl RemoteError {
	/// Response body the server sent along with the failure, if any
	pub fn response_body(&self) -> Option<&str> {
		match self {
			RemoteError::Status { body, .. } if !body.is_empty() => Some(body),
			_ => None,
		}
	}
}

impl fmt::Display for RemoteError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RemoteError::Transport(e) => write!(f, "Transport error: {}", e),
			RemoteError::Status { status, body } => {
				if body.is_empty() {
					write!(f, "HTTP {}", status)
				} else {
					write!(f, "HTTP {}: {}", status, body)
				}
			}
			RemoteError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
			RemoteError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
			RemoteError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
	fn from(e: reqwest::Error) -> Self {
		RemoteError::Transport(e)
	}
}

impl From<io::Error> for RemoteError {
	fn from(e: io::Error) -> Self {
		RemoteError::Io(e)
	}
}

impl From<serde_json::Error> for RemoteError {
	fn from(e: serde_json::Error) -> Self {
		RemoteError::InvalidResponse(e.to_string())
	}
}


// vim: ts=4
