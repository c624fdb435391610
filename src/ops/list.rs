//! Directory listing operation
//!
//! Resolves the requested directory first (when one was given), then asks the
//! server for a listing. The flags steer the cache: a trusted cached listing
//! can satisfy the request outright, a refresh bypasses the cache, and the
//! fallback flag downgrades a failed directory change to listing whatever
//! directory the session is currently in instead of failing the command.

use crate::command::{Command, ListFlags};
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::MessageLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
	Init,
	WaitCwd,
	List,
}

pub struct ListOp {
	path: Option<RemotePath>,
	subdir: String,
	flags: ListFlags,
	state: ListState,
	/// Directory being listed; None means the server-side current directory
	target: Option<RemotePath>,
}

impl ListOp {
	pub fn new(path: Option<RemotePath>, subdir: String, flags: ListFlags) -> Self {
		ListOp { path, subdir, flags, state: ListState::Init, target: None }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			ListState::Init => {
				if self.flags.contains(ListFlags::CLEAR_CACHE) {
					session.cache().clear(session.server());
				}

				match self.path.clone() {
					Some(path) => {
						let target =
							if self.subdir.is_empty() { path } else { path.join(&self.subdir) };
						session.status(
							MessageLevel::Status,
							&format!("Retrieving directory listing of '{}'", target),
						);
						self.target = Some(target.clone());
						self.state = ListState::WaitCwd;
						Step::Delegate(Command::Cwd { path: target })
					}
					None => {
						session.status(MessageLevel::Status, "Retrieving directory listing");
						self.target = session.current_dir().cloned();
						self.state = ListState::List;
						self.drive_list(session)
					}
				}
			}
			ListState::List => self.drive_list(session),
			ListState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	fn drive_list(&mut self, session: &mut Session) -> Step {
		if self.flags.contains(ListFlags::AVOID_CACHE) && !self.flags.contains(ListFlags::REFRESH) {
			// A cache miss is the internal not-found code; it never leaves
			// this function
			let lookup = self.consult_cache(session);
			if lookup.is_ok() {
				return Step::Done(ReplyCode::OK);
			}
		}

		match &self.target {
			Some(dir) => Step::Send(format!("ls {}", quote_filename(dir.as_str()))),
			None => Step::Send("ls".to_string()),
		}
	}

	fn consult_cache(&self, session: &Session) -> ReplyCode {
		match &self.target {
			Some(dir) if session.cache().dir_is_trusted(session.server(), dir) => ReplyCode::OK,
			_ => ReplyCode::NOT_FOUND,
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode, session: &mut Session) -> ReplyCode {
		match self.state {
			ListState::List => {
				if reply.is_ok() {
					if let Some(dir) = &self.target {
						session.cache().mark_dir_listed(session.server(), dir);
					}
				}
				reply
			}
			ListState::Init | ListState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(
		&mut self,
		child_reply: ReplyCode,
		_child_cmd: &Command,
		session: &mut Session,
	) -> ReplyCode {
		match self.state {
			ListState::WaitCwd => {
				if !child_reply.is_ok() {
					if !self.flags.contains(ListFlags::FALLBACK_CURRENT) {
						return child_reply;
					}
					// List whatever directory the session is in instead
					self.target = session.current_dir().cloned();
				}
				self.state = ListState::List;
				ReplyCode::CONTINUE
			}
			ListState::Init | ListState::List => ReplyCode::INTERNAL_ERROR,
		}
	}
}


// vim: ts=4
