//! Directory creation operation
//!
//! Always addresses the new directory by absolute path; creating a directory
//! must not depend on being positioned inside its parent, so there is no cwd
//! prerequisite here.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MkdirState {
	Init,
	Mkdir,
}

pub struct MkdirOp {
	path: RemotePath,
	state: MkdirState,
}

impl MkdirOp {
	pub fn new(path: RemotePath) -> Self {
		MkdirOp { path, state: MkdirState::Init }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			MkdirState::Init => {
				session.status(
					MessageLevel::Status,
					&format!("Creating directory '{}'", self.path),
				);

				// The parent's listing is about to gain an entry
				if let (Some(parent), Some(name)) = (self.path.parent(), self.path.name()) {
					session.cache().update_file(
						session.server(),
						&parent,
						name,
						false,
						AttributeState::Unknown,
					);
				}

				self.state = MkdirState::Mkdir;
				Step::Send(format!("mkdir {}", quote_filename(self.path.as_str())))
			}
			MkdirState::Mkdir => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			MkdirState::Mkdir => reply,
			MkdirState::Init => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, _child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		ReplyCode::INTERNAL_ERROR
	}
}


// vim: ts=4
