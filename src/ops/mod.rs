//! Operation state machines driving one command each
//!
//! Every command kind that talks to the server maps to one operation: a small
//! state machine the engine's driver loop steps through. An operation either
//! emits the next outbound protocol line, delegates a prerequisite to a
//! nested operation (directory positioning), or terminates with a reply
//! code. Errors are reply codes returned from the steps; operation state only
//! ever tracks protocol progress, never success or failure.
//!
//! Operations form a closed enum, so the dispatch table from command kind to
//! state machine is an exhaustive match, and a state/step combination an
//! operation does not cover answers with internal-error through an explicit
//! arm instead of falling through.

pub mod chmod;
pub mod cwd;
pub mod delete;
pub mod list;
pub mod mkdir;
pub mod raw;
pub mod removedir;
pub mod rename;
pub mod transfer;

use crate::command::{Command, CommandKind};
use crate::reply::ReplyCode;
use crate::session::Session;

pub use chmod::ChmodOp;
pub use cwd::CwdOp;
pub use delete::DeleteOp;
pub use list::ListOp;
pub use mkdir::MkdirOp;
pub use raw::RawOp;
pub use removedir::RemoveDirOp;
pub use rename::RenameOp;
pub use transfer::TransferOp;

/// What an operation wants the driver loop to do next.
///
/// `Send` and `Delegate` both mean "not finished": the loop performs the
/// exchange or runs the child to termination, feeds the result back in, and
/// asks again. `Done` carries the terminal reply code.
#[derive(Debug)]
pub enum Step {
	/// Emit this protocol line and await its reply
	Send(String),
	/// Run a nested operation for this command to termination first
	Delegate(Command),
	/// Terminal outcome
	Done(ReplyCode),
}

/// One in-flight command's state machine
pub enum Operation {
	Cwd(CwdOp),
	Chmod(ChmodOp),
	Delete(DeleteOp),
	List(ListOp),
	Mkdir(MkdirOp),
	RemoveDir(RemoveDirOp),
	Rename(RenameOp),
	Raw(RawOp),
	Transfer(TransferOp),
}

impl Operation {
	/// Dispatch table from command kind to operation. Connect and disconnect
	/// act on the session itself and have no protocol state machine.
	pub fn for_command(cmd: Command) -> Option<Operation> {
		match cmd {
			Command::Cwd { path } => Some(Operation::Cwd(CwdOp::new(path))),
			Command::Chmod { path, file, permission } => {
				Some(Operation::Chmod(ChmodOp::new(path, file, permission)))
			}
			Command::Delete { path, files } => Some(Operation::Delete(DeleteOp::new(path, files))),
			Command::List { path, subdir, flags } => {
				Some(Operation::List(ListOp::new(path, subdir, flags)))
			}
			Command::Mkdir { path } => Some(Operation::Mkdir(MkdirOp::new(path))),
			Command::RemoveDir { path, subdir } => {
				Some(Operation::RemoveDir(RemoveDirOp::new(path, subdir)))
			}
			Command::Rename { from_path, from_file, to_path, to_file } => {
				Some(Operation::Rename(RenameOp::new(from_path, from_file, to_path, to_file)))
			}
			Command::Raw { line } => Some(Operation::Raw(RawOp::new(line))),
			Command::Transfer { payload, remote_path, remote_file, flags } => {
				Some(Operation::Transfer(TransferOp::new(payload, remote_path, remote_file, flags)))
			}
			Command::Connect { .. } | Command::Disconnect => None,
		}
	}

	pub fn kind(&self) -> CommandKind {
		match self {
			Operation::Cwd(_) => CommandKind::Cwd,
			Operation::Chmod(_) => CommandKind::Chmod,
			Operation::Delete(_) => CommandKind::Delete,
			Operation::List(_) => CommandKind::List,
			Operation::Mkdir(_) => CommandKind::Mkdir,
			Operation::RemoveDir(_) => CommandKind::RemoveDir,
			Operation::Rename(_) => CommandKind::Rename,
			Operation::Raw(_) => CommandKind::Raw,
			Operation::Transfer(_) => CommandKind::Transfer,
		}
	}

	/// Produce the next action for the current state, or terminate
	pub fn drive_forward(&mut self, session: &mut Session) -> Step {
		match self {
			Operation::Cwd(op) => op.drive_forward(session),
			Operation::Chmod(op) => op.drive_forward(session),
			Operation::Delete(op) => op.drive_forward(session),
			Operation::List(op) => op.drive_forward(session),
			Operation::Mkdir(op) => op.drive_forward(session),
			Operation::RemoveDir(op) => op.drive_forward(session),
			Operation::Rename(op) => op.drive_forward(session),
			Operation::Raw(op) => op.drive_forward(session),
			Operation::Transfer(op) => op.drive_forward(session),
		}
	}

	/// Interpret the reply to the most recently emitted line
	pub fn response_received(&mut self, reply: ReplyCode, session: &mut Session) -> ReplyCode {
		match self {
			Operation::Cwd(op) => op.response_received(reply, session),
			Operation::Chmod(op) => op.response_received(reply),
			Operation::Delete(op) => op.response_received(reply),
			Operation::List(op) => op.response_received(reply, session),
			Operation::Mkdir(op) => op.response_received(reply),
			Operation::RemoveDir(op) => op.response_received(reply),
			Operation::Rename(op) => op.response_received(reply),
			Operation::Raw(op) => op.response_received(reply),
			Operation::Transfer(op) => op.response_received(reply),
		}
	}

	/// Resume after a delegated child reached its terminal reply code.
	/// Called exactly once per delegation by the driver loop.
	pub fn sub_operation_completed(
		&mut self,
		child_reply: ReplyCode,
		child_cmd: &Command,
		session: &mut Session,
	) -> ReplyCode {
		match self {
			Operation::Cwd(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::Chmod(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::Delete(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::List(op) => op.sub_operation_completed(child_reply, child_cmd, session),
			Operation::Mkdir(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::RemoveDir(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::Rename(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::Raw(op) => op.sub_operation_completed(child_reply, child_cmd),
			Operation::Transfer(op) => op.sub_operation_completed(child_reply, child_cmd),
		}
	}
}

/// Quote a name for an outbound protocol line when it needs it
pub(crate) fn quote_filename(name: &str) -> String {
	if name.is_empty() || name.contains(' ') || name.contains('"') {
		format!("\"{}\"", name.replace('"', "\"\""))
	} else {
		name.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::RemotePath;
	use crate::types::{Credentials, Server};

	#[test]
	fn test_quote_filename() {
		assert_eq!(quote_filename("a.txt"), "a.txt");
		assert_eq!(quote_filename("with space"), "\"with space\"");
		assert_eq!(quote_filename("has\"quote"), "\"has\"\"quote\"");
		assert_eq!(quote_filename(""), "\"\"");
	}

	#[test]
	fn test_dispatch_table_covers_protocol_kinds() {
		let cmd = Command::Chmod {
			path: RemotePath::new("/x"),
			file: "a".to_string(),
			permission: "755".to_string(),
		};
		let op = Operation::for_command(cmd).unwrap();
		assert_eq!(op.kind(), CommandKind::Chmod);

		assert!(Operation::for_command(Command::Disconnect).is_none());
		let connect = Command::Connect {
			server: Server::new("h", 22),
			credentials: Credentials::new("u", "p"),
			retry_connecting: false,
		};
		assert!(Operation::for_command(connect).is_none());
	}
}

// vim: ts=4
