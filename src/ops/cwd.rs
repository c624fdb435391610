//! Change-working-directory operation
//!
//! The prerequisite every path-addressed operation delegates to before its
//! own action. Keeps the session's current-directory tracking accurate: a
//! successful change records the new directory, a failed one clears the
//! tracking since the server-side state can no longer be assumed.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CwdState {
	Init,
	Cwd,
}

pub struct CwdOp {
	path: RemotePath,
	state: CwdState,
}

impl CwdOp {
	pub fn new(path: RemotePath) -> Self {
		CwdOp { path, state: CwdState::Init }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			CwdState::Init => {
				// Already there, no round trip needed
				if session.current_dir() == Some(&self.path) {
					return Step::Done(ReplyCode::OK);
				}
				self.state = CwdState::Cwd;
				Step::Send(format!("cd {}", quote_filename(self.path.as_str())))
			}
			CwdState::Cwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode, session: &mut Session) -> ReplyCode {
		match self.state {
			CwdState::Cwd => {
				if reply.is_ok() {
					session.set_current_dir(self.path.clone());
				} else {
					session.clear_current_dir();
				}
				reply
			}
			CwdState::Init => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, _child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		// A directory change never delegates
		ReplyCode::INTERNAL_ERROR
	}
}


// vim: ts=4
