//! Logging prelude and the status sink collaborator
//!
//! Re-exports the common tracing macros and provides the leveled status sink
//! the operations report user-facing progress through. Status messages are
//! emitted before the outcome of an action is known, so the user sees intent
//! even when the action ultimately fails.

pub use tracing::{debug, error, info, warn};

use std::sync::{Arc, Mutex};

use crate::types::MessageLevel;

/// Initialize the tracing subscriber with environment filter support.
///
/// By default, logs at INFO level and above are displayed. Control the log
/// level with the `RUST_LOG` environment variable:
///
/// ```bash
/// RUST_LOG=debug xferr ...
/// RUST_LOG=xferr=trace xferr ...
/// ```
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();
}

/// Sink for leveled, human-readable progress messages
pub trait StatusSink: Send {
	fn message(&self, level: MessageLevel, text: &str);
}

/// Default sink forwarding to tracing
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
	fn message(&self, level: MessageLevel, text: &str) {
		match level {
			MessageLevel::Status | MessageLevel::Info => info!("{}", text),
			MessageLevel::Warn => warn!("{}", text),
			MessageLevel::Error => error!("{}", text),
			MessageLevel::Debug => debug!("{}", text),
		}
	}
}

/// Sink that discards everything
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
	fn message(&self, _level: MessageLevel, _text: &str) {}
}

/// Sink that records messages for later inspection in tests
#[derive(Clone, Default)]
pub struct RecordingStatusSink {
	messages: Arc<Mutex<Vec<(MessageLevel, String)>>>,
}

impl RecordingStatusSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn messages(&self) -> Vec<(MessageLevel, String)> {
		self.messages.lock().expect("status sink lock poisoned").clone()
	}
}

impl StatusSink for RecordingStatusSink {
	fn message(&self, level: MessageLevel, text: &str) {
		self.messages.lock().expect("status sink lock poisoned").push((level, text.to_string()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_recording_sink_keeps_order() {
		let sink = RecordingStatusSink::new();
		sink.message(MessageLevel::Status, "first");
		sink.message(MessageLevel::Error, "second");

		let messages = sink.messages();
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0], (MessageLevel::Status, "first".to_string()));
		assert_eq!(messages[1], (MessageLevel::Error, "second".to_string()));
	}
}

// vim: ts=4
