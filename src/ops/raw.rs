//! Raw pass-through operation
//!
//! Hands the stored line to the server verbatim and returns whatever the
//! server said. No directory positioning, no cache interaction.

use crate::command::Command;
use crate::ops::Step;
use crate::reply::ReplyCode;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawState {
	Init,
	Sent,
}

pub struct RawOp {
	line: String,
	state: RawState,
}

impl RawOp {
	pub fn new(line: String) -> Self {
		RawOp { line, state: RawState::Init }
	}

	pub fn drive_forward(&mut self, _session: &mut Session) -> Step {
		match self.state {
			RawState::Init => {
				self.state = RawState::Sent;
				Step::Send(self.line.clone())
			}
			RawState::Sent => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			RawState::Sent => reply,
			RawState::Init => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, _child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		ReplyCode::INTERNAL_ERROR
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::MemoryCache;
	use crate::logging::NullStatusSink;
	use crate::transport::ScriptedTransport;
	use crate::types::Server;
	use std::sync::Arc;

	#[test]
	fn test_line_goes_out_verbatim() {
		let mut session = Session::new(
			Server::new("h", 22),
			Box::new(ScriptedTransport::new()),
			Arc::new(MemoryCache::new()),
			Box::new(NullStatusSink),
		);
		let mut op = RawOp::new("stat -f /".to_string());

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "stat -f /"),
			other => panic!("expected Send, got {:?}", other),
		}
		assert_eq!(op.response_received(ReplyCode::NOT_SUPPORTED), ReplyCode::NOT_SUPPORTED);
	}
}

// vim: ts=4
