//! File transfer operation
//!
//! Same directory-resolution shape as the permissions change, plus the
//! single-use payload handle: the local side of the transfer is extracted
//! exactly once when the transfer line is composed. A replayed command whose
//! payload was already consumed terminates critically instead of guessing at
//! the local state.

use crate::command::{Command, PayloadSlot, TransferFlags};
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferState {
	Init,
	WaitCwd,
	Transfer,
}

pub struct TransferOp {
	payload: PayloadSlot,
	remote_path: RemotePath,
	remote_file: String,
	flags: TransferFlags,
	state: TransferState,
	use_absolute: bool,
}

impl TransferOp {
	pub fn new(
		payload: PayloadSlot,
		remote_path: RemotePath,
		remote_file: String,
		flags: TransferFlags,
	) -> Self {
		TransferOp {
			payload,
			remote_path,
			remote_file,
			flags,
			state: TransferState::Init,
			use_absolute: false,
		}
	}

	fn download(&self) -> bool {
		self.flags.contains(TransferFlags::DOWNLOAD)
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			TransferState::Init => {
				let direction = if self.download() { "Downloading" } else { "Uploading" };
				session.status(
					MessageLevel::Status,
					&format!(
						"{} '{}'",
						direction,
						self.remote_path.format_filename(&self.remote_file, false)
					),
				);
				self.state = TransferState::WaitCwd;
				Step::Delegate(Command::Cwd { path: self.remote_path.clone() })
			}
			TransferState::Transfer => {
				let local = match self.payload.take() {
					Ok(local) => local,
					Err(e) => {
						session.status(MessageLevel::Error, &e.to_string());
						return Step::Done(ReplyCode::CRITICAL_ERROR);
					}
				};

				// An upload rewrites the remote file's attributes
				if !self.download() {
					session.cache().update_file(
						session.server(),
						&self.remote_path,
						&self.remote_file,
						false,
						AttributeState::Unknown,
					);
				}

				let remote = quote_filename(
					&self.remote_path.format_filename(&self.remote_file, !self.use_absolute),
				);
				let local = quote_filename(&local.to_string_lossy());
				let line = if self.download() {
					format!("get {} {}", remote, local)
				} else {
					format!("put {} {}", local, remote)
				};
				Step::Send(line)
			}
			TransferState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			TransferState::Transfer => reply,
			TransferState::Init | TransferState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		match self.state {
			TransferState::WaitCwd => {
				if !child_reply.is_ok() {
					self.use_absolute = true;
				}
				self.state = TransferState::Transfer;
				ReplyCode::CONTINUE
			}
			TransferState::Init | TransferState::Transfer => ReplyCode::INTERNAL_ERROR,
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
	use std::path::PathBuf;
	use std::sync::Arc;

	fn session() -> Session {
		Session::new(
			Server::new("h", 22),
			Box::new(ScriptedTransport::new()),
			Arc::new(MemoryCache::new()),
			Box::new(NullStatusSink),
		)
	}

	fn upload() -> TransferOp {
		TransferOp::new(
			PayloadSlot::new(PathBuf::from("/tmp/a.txt")),
			RemotePath::new("/srv"),
			"a.txt".to_string(),
			TransferFlags::empty(),
		)
	}

	#[test]
	fn test_upload_line_after_successful_cwd() {
		let mut session = session();
		let mut op = upload();

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "put /tmp/a.txt a.txt"),
			other => panic!("expected Send, got {:?}", other),
		}
	}

	#[test]
	fn test_download_uses_get_direction() {
		let mut session = session();
		let mut op = TransferOp::new(
			PayloadSlot::new(PathBuf::from("/tmp/a.txt")),
			RemotePath::new("/srv"),
			"a.txt".to_string(),
			TransferFlags::DOWNLOAD,
		);

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::ERROR, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "get /srv/a.txt /tmp/a.txt"),
			other => panic!("expected Send, got {:?}", other),
		}
	}

	#[test]
	fn test_consumed_payload_terminates_critically() {
		let mut session = session();
		let mut slot = PayloadSlot::new(PathBuf::from("/tmp/a.txt"));
		slot.take().unwrap();
		let mut op = TransferOp::new(
			slot,
			RemotePath::new("/srv"),
			"a.txt".to_string(),
			TransferFlags::empty(),
		);

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);

		match op.drive_forward(&mut session) {
			Step::Done(code) => assert!(code.contains(ReplyCode::CRITICAL_ERROR)),
			other => panic!("expected critical Done, got {:?}", other),
		}
	}
}

// vim: ts=4
