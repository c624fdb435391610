//! File deletion operation
//!
//! One removal round trip per file. A failed file does not abort the rest of
//! the list; the failure is remembered and the terminal code reports ok only
//! when every file went through. Critical and canceled replies abort
//! immediately.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteState {
	Init,
	WaitCwd,
	Delete,
}

pub struct DeleteOp {
	path: RemotePath,
	files: Vec<String>,
	state: DeleteState,
	use_absolute: bool,
	next: usize,
	failed: bool,
}

impl DeleteOp {
	pub fn new(path: RemotePath, files: Vec<String>) -> Self {
		DeleteOp { path, files, state: DeleteState::Init, use_absolute: false, next: 0, failed: false }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			DeleteState::Init => {
				session.status(
					MessageLevel::Status,
					&format!("Deleting {} file(s) in '{}'", self.files.len(), self.path),
				);
				self.state = DeleteState::WaitCwd;
				Step::Delegate(Command::Cwd { path: self.path.clone() })
			}
			DeleteState::Delete => {
				if self.next >= self.files.len() {
					return Step::Done(if self.failed { ReplyCode::ERROR } else { ReplyCode::OK });
				}

				let file = &self.files[self.next];
				session.cache().update_file(
					session.server(),
					&self.path,
					file,
					false,
					AttributeState::Unknown,
				);

				let name = quote_filename(&self.path.format_filename(file, !self.use_absolute));
				Step::Send(format!("rm {}", name))
			}
			DeleteState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			DeleteState::Delete => {
				if reply.contains(ReplyCode::CRITICAL_ERROR) || reply.contains(ReplyCode::CANCELED) {
					return reply;
				}
				if reply.is_error() {
					self.failed = true;
				}
				self.next += 1;
				ReplyCode::CONTINUE
			}
			DeleteState::Init | DeleteState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		match self.state {
			DeleteState::WaitCwd => {
				if !child_reply.is_ok() {
					self.use_absolute = true;
				}
				self.state = DeleteState::Delete;
				ReplyCode::CONTINUE
			}
			DeleteState::Init | DeleteState::Delete => ReplyCode::INTERNAL_ERROR,
		}
	}
}


// vim: ts=4
