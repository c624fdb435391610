//! Shared value objects: server identity, credentials, attribute state

use std::fmt;

/// Identity of the remote server a session talks to
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Server {
	pub host: String,
	pub port: u16,
}

impl Server {
	pub fn new(host: &str, port: u16) -> Self {
		Server { host: host.to_string(), port }
	}

	/// Cache key for this server
	pub fn key(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

impl fmt::Display for Server {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

/// Login credentials. The password never appears in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	pub user: String,
	pub password: String,
}

impl Credentials {
	pub fn new(user: &str, password: &str) -> Self {
		Credentials { user: user.to_string(), password: password.to_string() }
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("user", &self.user)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Trustworthiness of a cached attribute set
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttributeState {
	/// Attributes may have changed on the server and can no longer be trusted
	Unknown,
	/// Attributes reflect a listing the server delivered
	Known,
}

/// Severity of a user-facing status message
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageLevel {
	/// Progress notice describing the action about to be attempted
	Status,
	Info,
	Warn,
	Error,
	Debug,
}

impl fmt::Display for MessageLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MessageLevel::Status => write!(f, "status"),
			MessageLevel::Info => write!(f, "info"),
			MessageLevel::Warn => write!(f, "warn"),
			MessageLevel::Error => write!(f, "error"),
			MessageLevel::Debug => write!(f, "debug"),
		}
	}
}


// vim: ts=4
