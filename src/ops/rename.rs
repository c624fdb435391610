//! Rename/move operation
//!
//! Positions the session at the source directory; the source side follows the
//! relative-vs-absolute downgrade, the destination is always spelled fully
//! qualified so a move across directories works regardless of where the
//! session ended up.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameState {
	Init,
	WaitCwd,
	Rename,
}

pub struct RenameOp {
	from_path: RemotePath,
	from_file: String,
	to_path: RemotePath,
	to_file: String,
	state: RenameState,
	use_absolute: bool,
}

impl RenameOp {
	pub fn new(from_path: RemotePath, from_file: String, to_path: RemotePath, to_file: String) -> Self {
		RenameOp { from_path, from_file, to_path, to_file, state: RenameState::Init, use_absolute: false }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			RenameState::Init => {
				session.status(
					MessageLevel::Status,
					&format!(
						"Renaming '{}' to '{}'",
						self.from_path.format_filename(&self.from_file, false),
						self.to_path.format_filename(&self.to_file, false)
					),
				);
				self.state = RenameState::WaitCwd;
				Step::Delegate(Command::Cwd { path: self.from_path.clone() })
			}
			RenameState::Rename => {
				// Both ends of the move are stale once the server acts
				session.cache().update_file(
					session.server(),
					&self.from_path,
					&self.from_file,
					false,
					AttributeState::Unknown,
				);
				session.cache().update_file(
					session.server(),
					&self.to_path,
					&self.to_file,
					false,
					AttributeState::Unknown,
				);

				let from =
					quote_filename(&self.from_path.format_filename(&self.from_file, !self.use_absolute));
				let to = quote_filename(&self.to_path.format_filename(&self.to_file, false));
				Step::Send(format!("mv {} {}", from, to))
			}
			RenameState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			RenameState::Rename => reply,
			RenameState::Init | RenameState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		match self.state {
			RenameState::WaitCwd => {
				if !child_reply.is_ok() {
					self.use_absolute = true;
				}
				self.state = RenameState::Rename;
				ReplyCode::CONTINUE
			}
			RenameState::Init | RenameState::Rename => ReplyCode::INTERNAL_ERROR,
		}
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

	fn session() -> Session {
		Session::new(
			Server::new("h", 22),
			Box::new(ScriptedTransport::new()),
			Arc::new(MemoryCache::new()),
			Box::new(NullStatusSink),
		)
	}

	fn op() -> RenameOp {
		RenameOp::new(
			RemotePath::new("/srv"),
			"a.txt".to_string(),
			RemotePath::new("/archive"),
			"a-2024.txt".to_string(),
		)
	}

	#[test]
	fn test_destination_is_always_fully_qualified() {
		let mut session = session();
		let mut op = op();

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "mv a.txt /archive/a-2024.txt"),
			other => panic!("expected Send, got {:?}", other),
		}
	}

	#[test]
	fn test_failed_cwd_qualifies_the_source_too() {
		let mut session = session();
		let mut op = op();

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::ERROR, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "mv /srv/a.txt /archive/a-2024.txt"),
			other => panic!("expected Send, got {:?}", other),
		}
	}
}

// vim: ts=4
