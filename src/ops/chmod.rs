//! Permissions-change operation
//!
//! Positions the session in the target directory first, then emits the
//! permission change. A failed directory change does not abort the command:
//! it only downgrades addressing to the fully-qualified path, since some
//! servers reject directory changes the client does not strictly need while
//! still accepting the change itself by absolute path.

use crate::command::Command;
use crate::ops::{quote_filename, Step};
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::session::Session;
use crate::types::{AttributeState, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChmodState {
	Init,
	WaitCwd,
	Chmod,
}

pub struct ChmodOp {
	path: RemotePath,
	file: String,
	permission: String,
	state: ChmodState,
	use_absolute: bool,
}

impl ChmodOp {
	pub fn new(path: RemotePath, file: String, permission: String) -> Self {
		ChmodOp { path, file, permission, state: ChmodState::Init, use_absolute: false }
	}

	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self.state {
			ChmodState::Init => {
				session.status(
					MessageLevel::Status,
					&format!(
						"Setting permissions of '{}' to '{}'",
						self.path.format_filename(&self.file, false),
						self.permission
					),
				);
				self.state = ChmodState::WaitCwd;
				Step::Delegate(Command::Cwd { path: self.path.clone() })
			}
			ChmodState::Chmod => {
				// The attributes are about to change; whatever is cached for
				// this file can no longer be trusted
				session.cache().update_file(
					session.server(),
					&self.path,
					&self.file,
					false,
					AttributeState::Unknown,
				);

				let name = quote_filename(&self.path.format_filename(&self.file, !self.use_absolute));
				Step::Send(format!("chmod {} {}", self.permission, name))
			}
			ChmodState::WaitCwd => Step::Done(ReplyCode::INTERNAL_ERROR),
		}
	}

	pub fn response_received(&mut self, reply: ReplyCode) -> ReplyCode {
		match self.state {
			ChmodState::Chmod => reply,
			ChmodState::Init | ChmodState::WaitCwd => ReplyCode::INTERNAL_ERROR,
		}
	}

	pub fn sub_operation_completed(&mut self, child_reply: ReplyCode, _child_cmd: &Command) -> ReplyCode {
		match self.state {
			ChmodState::WaitCwd => {
				if !child_reply.is_ok() {
					self.use_absolute = true;
				}
				self.state = ChmodState::Chmod;
				ReplyCode::CONTINUE
			}
			ChmodState::Init | ChmodState::Chmod => ReplyCode::INTERNAL_ERROR,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::MemoryCache;
	use crate::logging::{NullStatusSink, RecordingStatusSink};
	use crate::transport::ScriptedTransport;
	use crate::types::{Credentials, Server};
	use std::sync::Arc;

	async fn session_with_cache(cache: Arc<MemoryCache>) -> Session {
		let mut session = Session::new(
			Server::new("h", 22),
			Box::new(ScriptedTransport::new()),
			cache,
			Box::new(NullStatusSink),
		);
		session.connect(Server::new("h", 22), &Credentials::new("u", "p")).await;
		session
	}

	fn op() -> ChmodOp {
		ChmodOp::new(RemotePath::new("/home/u"), "a.txt".to_string(), "755".to_string())
	}

	#[tokio::test]
	async fn test_init_reports_intent_and_delegates_cwd() {
		let sink = RecordingStatusSink::new();
		let mut session = Session::new(
			Server::new("h", 22),
			Box::new(ScriptedTransport::new()),
			Arc::new(MemoryCache::new()),
			Box::new(sink.clone()),
		);
		let mut op = op();

		match op.drive_forward(&mut session) {
			Step::Delegate(Command::Cwd { path }) => assert_eq!(path, RemotePath::new("/home/u")),
			other => panic!("expected cwd delegation, got {:?}", other),
		}

		let messages = sink.messages();
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].0, MessageLevel::Status);
		assert!(messages[0].1.contains("/home/u/a.txt"));
		assert!(messages[0].1.contains("755"));
	}

	#[tokio::test]
	async fn test_successful_cwd_keeps_relative_addressing() {
		let cache = Arc::new(MemoryCache::new());
		let mut session = session_with_cache(Arc::clone(&cache)).await;
		let mut op = op();

		op.drive_forward(&mut session);
		assert!(op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect).is_continue());

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "chmod 755 a.txt"),
			other => panic!("expected Send, got {:?}", other),
		}

		// Cache entry invalidated before the line went out
		let entry = cache
			.file_entry(&Server::new("h", 22), &RemotePath::new("/home/u"), "a.txt")
			.unwrap();
		assert!(!entry.trusted);
		assert_eq!(entry.state, AttributeState::Unknown);
	}

	#[tokio::test]
	async fn test_failed_cwd_downgrades_to_absolute_addressing() {
		let mut session = session_with_cache(Arc::new(MemoryCache::new())).await;
		let mut op = op();

		op.drive_forward(&mut session);
		let code = op.sub_operation_completed(ReplyCode::ERROR, &Command::Disconnect);
		assert!(code.is_continue());
		assert!(!code.is_error());

		match op.drive_forward(&mut session) {
			Step::Send(line) => assert_eq!(line, "chmod 755 /home/u/a.txt"),
			other => panic!("expected Send, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_response_passes_through_unchanged() {
		let mut session = session_with_cache(Arc::new(MemoryCache::new())).await;
		let mut op = op();

		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);
		op.drive_forward(&mut session);

		let critical = ReplyCode::CRITICAL_ERROR | ReplyCode::WRITE_FAILED;
		assert_eq!(op.response_received(critical), critical);
	}

	#[tokio::test]
	async fn test_uncovered_combinations_are_internal_errors() {
		let mut session = session_with_cache(Arc::new(MemoryCache::new())).await;
		let mut op = op();

		// Response before any action was emitted
		assert_eq!(op.response_received(ReplyCode::OK), ReplyCode::INTERNAL_ERROR);

		// Child completion while no delegation is pending
		op.drive_forward(&mut session);
		op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect);
		assert_eq!(
			op.sub_operation_completed(ReplyCode::OK, &Command::Disconnect),
			ReplyCode::INTERNAL_ERROR
		);

		// Drive while waiting on the child
		let mut waiting = super::ChmodOp::new(
			RemotePath::new("/home/u"),
			"a.txt".to_string(),
			"755".to_string(),
		);
		waiting.drive_forward(&mut session);
		match waiting.drive_forward(&mut session) {
			Step::Done(code) => assert_eq!(code, ReplyCode::INTERNAL_ERROR),
			other => panic!("expected Done(internal), got {:?}", other),
		}
	}
}

// vim: ts=4
