//! Engine: command admission and the driver loop
//!
//! The engine owns one session and runs one command at a time through its
//! operation. Validity is checked here, once, at admission; an operation
//! never sees an invalid command. The driver loop steps the operation until
//! it terminates: an emitted line is exchanged over the session, a delegated
//! command is run as a nested operation to termination with the result fed
//! back in, and the terminal reply code crosses the engine boundary only
//! after the internal-bit check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::command::Command;
use crate::logging::*;
use crate::ops::{Operation, Step};
use crate::reply::ReplyCode;
use crate::session::Session;

/// Shared handle aborting the in-flight command between steps
#[derive(Clone, Default)]
pub struct CancelHandle {
	flag: Arc<AtomicBool>,
}

impl CancelHandle {
	pub fn cancel(&self) {
		self.flag.store(true, Ordering::SeqCst);
	}

	pub fn is_canceled(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}

	fn clear(&self) {
		self.flag.store(false, Ordering::SeqCst);
	}
}

pub struct Engine {
	session: Session,
	busy: bool,
	cancel: CancelHandle,
}

impl Engine {
	pub fn new(session: Session) -> Self {
		Engine { session, busy: false, cancel: CancelHandle::default() }
	}

	/// Handle for aborting the command currently in flight
	pub fn cancel_handle(&self) -> CancelHandle {
		self.cancel.clone()
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Run one pre-validated command to its terminal reply code.
	///
	/// The session serializes execution: a command arriving while another is
	/// in flight is rejected with busy, an invalid one with syntax-error.
	pub async fn execute(&mut self, cmd: Command) -> ReplyCode {
		if self.busy {
			return ReplyCode::BUSY;
		}
		if !cmd.valid() {
			warn!("rejecting invalid {} command", cmd.kind());
			return ReplyCode::SYNTAX_ERROR;
		}

		let kind = cmd.kind();
		self.busy = true;
		let code = self.dispatch(cmd).await;
		self.busy = false;
		self.cancel.clear();

		let public = code.into_public();
		debug!("{} finished: {}", kind, public);
		public
	}

	async fn dispatch(&mut self, cmd: Command) -> ReplyCode {
		match cmd {
			Command::Connect { server, credentials, retry_connecting } => {
				let mut code = self.session.connect(server.clone(), &credentials).await;
				if retry_connecting && Self::connect_retryable(code) && !self.cancel.is_canceled()
				{
					debug!("retrying connect to {}", server);
					code = self.session.connect(server, &credentials).await;
				}
				code
			}
			Command::Disconnect => self.session.disconnect().await,
			Command::Cwd { .. } => {
				// Internal kind, not accepted from callers
				warn!("cwd command rejected at the engine boundary");
				ReplyCode::NOT_SUPPORTED
			}
			cmd => {
				if !self.session.is_connected() {
					return ReplyCode::NOT_CONNECTED;
				}
				match Operation::for_command(cmd) {
					Some(op) => self.run_operation(op).await,
					None => ReplyCode::INTERNAL_ERROR,
				}
			}
		}
	}

	fn connect_retryable(code: ReplyCode) -> bool {
		code.is_error()
			&& !code.contains(ReplyCode::CRITICAL_ERROR)
			&& !code.contains(ReplyCode::CANCELED)
			&& !code.contains(ReplyCode::ALREADY_CONNECTED)
	}

	/// Drive one operation to termination. A delegated child runs to its own
	/// terminal code inside the parent's suspended window; the parent resumes
	/// through exactly one sub_operation_completed call.
	async fn run_operation(&mut self, mut op: Operation) -> ReplyCode {
		loop {
			if self.cancel.is_canceled() {
				debug!("{} operation canceled", op.kind());
				return ReplyCode::CANCELED;
			}

			match op.drive_forward(&mut self.session) {
				Step::Send(line) => {
					let reply = self.session.exchange(&line).await;
					let code = op.response_received(reply, &mut self.session);
					if !code.is_continue() {
						return code;
					}
				}
				Step::Delegate(cmd) => {
					debug!("{} delegating to {}", op.kind(), cmd.kind());
					let child = match Operation::for_command(cmd.clone()) {
						Some(child) => child,
						None => return ReplyCode::INTERNAL_ERROR,
					};
					let child_code = Box::pin(self.run_operation(child)).await;
					if child_code.contains(ReplyCode::CANCELED) {
						return child_code;
					}
					let code = op.sub_operation_completed(child_code, &cmd, &mut self.session);
					if !code.is_continue() {
						return code;
					}
				}
				Step::Done(code) => return code,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::MemoryCache;
	use crate::logging::NullStatusSink;
	use crate::path::RemotePath;
	use crate::transport::ScriptedTransport;
	use crate::types::{Credentials, Server};

	fn engine_with(transport: ScriptedTransport) -> Engine {
		Engine::new(Session::new(
			Server::new("h", 22),
			Box::new(transport),
			Arc::new(MemoryCache::new()),
			Box::new(NullStatusSink),
		))
	}

	fn connect_cmd() -> Command {
		Command::Connect {
			server: Server::new("h", 22),
			credentials: Credentials::new("u", "p"),
			retry_connecting: false,
		}
	}

	fn chmod_cmd() -> Command {
		Command::Chmod {
			path: RemotePath::new("/home/u"),
			file: "a.txt".to_string(),
			permission: "755".to_string(),
		}
	}

	#[tokio::test]
	async fn test_invalid_command_rejected_at_admission() {
		let mut engine = engine_with(ScriptedTransport::new());
		let invalid = Command::Raw { line: String::new() };
		assert_eq!(engine.execute(invalid).await, ReplyCode::SYNTAX_ERROR);
	}

	#[tokio::test]
	async fn test_busy_engine_rejects_second_command() {
		let mut engine = engine_with(ScriptedTransport::new());
		engine.busy = true;
		assert_eq!(engine.execute(Command::Disconnect).await, ReplyCode::BUSY);
	}

	#[tokio::test]
	async fn test_protocol_command_requires_connection() {
		let mut engine = engine_with(ScriptedTransport::new());
		assert_eq!(engine.execute(chmod_cmd()).await, ReplyCode::NOT_CONNECTED);
	}

	#[tokio::test]
	async fn test_internal_cwd_kind_rejected_from_callers() {
		let mut engine = engine_with(ScriptedTransport::new());
		engine.execute(connect_cmd()).await;
		let cmd = Command::Cwd { path: RemotePath::new("/x") };
		assert_eq!(engine.execute(cmd).await, ReplyCode::NOT_SUPPORTED);
	}

	#[tokio::test]
	async fn test_chmod_runs_nested_cwd_then_chmod() {
		let mut transport = ScriptedTransport::new();
		transport.push_reply(ReplyCode::OK); // cd
		transport.push_reply(ReplyCode::OK); // chmod
		let log = transport.sent_log();
		let mut engine = engine_with(transport);

		engine.execute(connect_cmd()).await;
		let code = engine.execute(chmod_cmd()).await;
		assert!(code.is_ok());

		let sent = log.lock().unwrap().clone();
		assert_eq!(sent, vec!["cd /home/u".to_string(), "chmod 755 a.txt".to_string()]);
	}

	#[tokio::test]
	async fn test_cancel_aborts_before_the_next_step() {
		let mut engine = engine_with(ScriptedTransport::new());
		engine.execute(connect_cmd()).await;

		engine.cancel_handle().cancel();
		let code = engine.execute(chmod_cmd()).await;
		assert!(code.contains(ReplyCode::CANCELED));
		assert!(code.is_error());

		// The pending cancel is consumed with the command
		assert!(!engine.cancel_handle().is_canceled());
	}

	#[tokio::test]
	async fn test_terminal_code_never_carries_internal_bits() {
		let mut transport = ScriptedTransport::new();
		transport.push_reply(ReplyCode::OK);
		transport.push_reply(ReplyCode::OK);
		let mut engine = engine_with(transport);

		engine.execute(connect_cmd()).await;
		let code = engine.execute(chmod_cmd()).await;
		assert!(!code.has_internal_bits());
	}

	#[tokio::test]
	async fn test_connect_retry_happens_once() {
		let mut transport = ScriptedTransport::new();
		transport.set_connect_reply(ReplyCode::ERROR);
		let mut engine = engine_with(transport);

		let cmd = Command::Connect {
			server: Server::new("h", 22),
			credentials: Credentials::new("u", "p"),
			retry_connecting: true,
		};
		// First attempt fails, the scripted retry succeeds
		let code = engine.execute(cmd).await;
		assert!(code.is_ok());
		assert!(engine.session().is_connected());
	}
}

// vim: ts=4
