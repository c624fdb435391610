//! Engine configuration
//!
//! Built-in defaults, optionally overridden by a TOML config file. Keys the
//! file does not mention keep their defaults, so a config file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
	/// Helper program speaking the wire protocol to the server
	pub agent_command: String,

	/// Extra arguments passed to the helper
	pub agent_args: Vec<String>,

	/// Transport-owned timeout for one exchange, in seconds
	pub exchange_timeout_secs: u64,

	/// Retry a failed connect once before giving up
	pub retry_connecting: bool,

	/// Port used when the caller does not give one
	pub default_port: u16,
}

impl Default for EngineConfig {
	fn default() -> Self {
		EngineConfig {
			agent_command: "xferr-agent".to_string(),
			agent_args: Vec::new(),
			exchange_timeout_secs: 30,
			retry_connecting: true,
			default_port: 22,
		}
	}
}

impl EngineConfig {
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Load from a config file; a missing file means built-in defaults
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Ok(Self::default());
		}
		let text = fs::read_to_string(path)
			.map_err(|e| ConfigError::Read { path: path.to_path_buf(), source: e })?;
		Self::from_toml(&text)
	}

	pub fn exchange_timeout(&self) -> Duration {
		Duration::from_secs(self.exchange_timeout_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = EngineConfig::default();
		assert_eq!(config.agent_command, "xferr-agent");
		assert_eq!(config.exchange_timeout_secs, 30);
		assert!(config.retry_connecting);
		assert_eq!(config.default_port, 22);
	}

	#[test]
	fn test_partial_override_keeps_defaults() {
		let config = EngineConfig::from_toml(
			"agent-command = \"ssh-agent-shim\"\nexchange-timeout-secs = 5\n",
		)
		.unwrap();
		assert_eq!(config.agent_command, "ssh-agent-shim");
		assert_eq!(config.exchange_timeout_secs, 5);
		// Untouched keys keep their defaults
		assert_eq!(config.default_port, 22);
		assert!(config.retry_connecting);
	}

	#[test]
	fn test_garbage_is_a_parse_error() {
		assert!(EngineConfig::from_toml("agent-command = [not toml").is_err());
	}

	#[test]
	fn test_load_missing_file_gives_defaults() {
		let config = EngineConfig::load(Path::new("/nonexistent/xferr.toml")).unwrap();
		assert_eq!(config, EngineConfig::default());
	}

	#[test]
	fn test_load_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "default-port = 2222\n").unwrap();

		let config = EngineConfig::load(&path).unwrap();
		assert_eq!(config.default_port, 2222);
	}
}

// vim: ts=4
