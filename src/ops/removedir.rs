//! Directory removal operation
//!
//! Positions the session in the parent of the doomed directory, with the
//! usual absolute-path downgrade when the directory change fails.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveDirState {
	Init,
	WaitCwd,
	Rmdir,
}

pub struct RemoveDirOp {
	/// Directory being removed, `path` joined with the subdir when one is given
	target: RemotePath,
	state: RemoveDirState,
	use_absolute: bool,
}

impl RemoveDirOp {
	pub fn new(path: RemotePath, subdir: String) -> Self {
		let target = if subdir.is_empty() { path } else { path.join(&subdir) };
		RemoveDirOp { target, state: RemoveDirState::Init, use_absolute: false }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			RemoveDirState::Init => {
				session.status(
					MessageLevel::Status,
					&format!("Removing directory '{}'", self.target),
				);
				self.state = RemoveDirState::WaitCwd;
				match self.target.parent() {
					Some(parent) => Step::Delegate(Command::Cwd { path: parent }),
					// Removing the root cannot work, the server will say so
					None => {
						self.use_absolute = true;
						self.state = RemoveDirState::Rmdir;
						self.drive_rmdir(session)
					}
				}
			}
			RemoveDirState::Rmdir => self.drive_rmdir(session),
			RemoveDirState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	fn drive_rmdir(&mut self, session: &mut Session) -> Step {
		if let (Some(parent), Some(name)) = (self.target.parent(), self.target.name()) {
			session.cache().update_file(
				session.server(),
				&parent,
				name,
				false,
				AttributeState::Unknown,
			);

			let spelled = quote_filename(&parent.format_filename(name, !self.use_absolute));
			Step::Send(format!("rmdir {}", spelled))
		} else {
			Step::Send(format!("rmdir {}", quote_filename(self.target.as_str())))
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			RemoveDirState::Rmdir => reply,
			RemoveDirState::Init | RemoveDirState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		match self.state {
			RemoveDirState::WaitCwd => {
				if !child_reply.is_ok() {
					self.use_absolute = true;
				}
				self.state = RemoveDirState::Rmdir;
				ReplyCode::CONTINUE
			}
			RemoveDirState::Init | RemoveDirState::Rmdir => ReplyCode::INTERNAL_ERROR,
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

	#[test]
	fn test_cwd_to_parent_then_relative_rmdir() {
		let mut session = session();
		let mut op = RemoveDirOp::new(RemotePath::new("/srv"), "old".to_string());

		match op.drive_forward(&mut session) {
			Step::Delegate(Command::Cwd { path }) => assert_eq!(path, RemotePath::new("/srv")),
			other => panic!("expected cwd delegation, got {:?}", other),
		}
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "rmdir old"),
			other => panic!("expected Send, got {:?}", other),
		}
	}

	#[test]
	fn test_failed_cwd_uses_absolute_path() {
		let mut session = session();
		let mut op = RemoveDirOp::new(RemotePath::new("/srv/old"), String::new());

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::ERROR, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "rmdir /srv/old"),
			other => panic!("expected Send, got {:?}", other),
		}
	}
}

// vim: ts=4
