//! Error types for transport and configuration failures
//!
//! Protocol outcomes travel as [`crate::reply::ReplyCode`] bitmasks; the Rust
//! error types here cover the I/O layer underneath (spawning and talking to
//! the transport process) and configuration loading. The session boundary
//! maps transport errors to reply codes via [`TransportError::to_reply`].

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::reply::ReplyCode;

/// Transport-level errors
#[derive(Debug)]
pub enum TransportError {
	/// Helper process spawn failed
	SpawnFailed { cmd: String, source: io::Error },

	/// Child process stdio unavailable
	StdioUnavailable { what: String },

	/// Connection closed unexpectedly
	Disconnected,

	/// The transport-owned exchange timer expired
	Timeout,

	/// Reply line did not follow the wire format
	ProtocolViolation { message: String },

	/// Exchange attempted without an established connection
	NotConnected,

	/// I/O error on the child pipes
	Io(io::Error),
}

impl fmt::Display for TransportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransportError::SpawnFailed { cmd, source } => {
				write!(f, "Failed to spawn '{}': {}", cmd, source)
			}
			TransportError::StdioUnavailable { what } => {
				write!(f, "Stdio unavailable: {}", what)
			}
			TransportError::Disconnected => write!(f, "Connection disconnected"),
			TransportError::Timeout => write!(f, "Exchange timeout"),
			TransportError::ProtocolViolation { message } => {
				write!(f, "Protocol violation: {}", message)
			}
			TransportError::NotConnected => write!(f, "Not connected"),
			TransportError::Io(e) => write!(f, "I/O error: {}", e),
		}
	}
}

impl Error for TransportError {}

impl From<io::Error> for TransportError {
	fn from(e: io::Error) -> Self {
		TransportError::Io(e)
	}
}

impl TransportError {
	/// Reply code this failure surfaces as at the session boundary
	pub fn to_reply(&self) -> ReplyCode {
		match self {
			TransportError::Timeout => ReplyCode::TIMEOUT,
			TransportError::Disconnected => ReplyCode::ERROR | ReplyCode::DISCONNECTED,
			TransportError::NotConnected => ReplyCode::NOT_CONNECTED,
			TransportError::SpawnFailed { .. } => ReplyCode::CRITICAL_ERROR,
			TransportError::StdioUnavailable { .. } => ReplyCode::CRITICAL_ERROR,
			TransportError::ProtocolViolation { .. } => ReplyCode::ERROR,
			TransportError::Io(_) => ReplyCode::ERROR | ReplyCode::DISCONNECTED,
		}
	}
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Config file could not be read
	Read { path: PathBuf, source: io::Error },

	/// Config file could not be parsed
	Parse { message: String },
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Read { path, source } => {
				write!(f, "Failed to read config {}: {}", path.display(), source)
			}
			ConfigError::Parse { message } => write!(f, "Failed to parse config: {}", message),
		}
	}
}

impl Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
	fn from(e: toml::de::Error) -> Self {
		ConfigError::Parse { message: e.to_string() }
	}
}


// vim: ts=4
