//! Command model: what the caller asked for
//!
//! A command is an immutable, validated description of one requested action,
//! one variant per kind. Validity is checked once at admission by the
//! dispatcher; an invalid command must never reach an operation. Commands are
//! cloneable so a request can be re-issued (reconnect-and-retry lives above
//! this layer) without re-deriving it from user input.

use std::error::Error;
use std::fmt;
use std::ops::BitOr;
use std::path::PathBuf;

use crate::path::RemotePath;
use crate::types::{Credentials, Server};

/// Command kind tag, used by the dispatcher to select the operation
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CommandKind {
	Connect,
	Disconnect,
	List,
	Transfer,
	Delete,
	RemoveDir,
	Mkdir,
	Rename,
	Chmod,
	Raw,
	/// Engine-internal: change working directory. Not accepted from callers.
	Cwd,
}

impl fmt::Display for CommandKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			CommandKind::Connect => "connect",
			CommandKind::Disconnect => "disconnect",
			CommandKind::List => "list",
			CommandKind::Transfer => "transfer",
			CommandKind::Delete => "delete",
			CommandKind::RemoveDir => "removedir",
			CommandKind::Mkdir => "mkdir",
			CommandKind::Rename => "rename",
			CommandKind::Chmod => "chmod",
			CommandKind::Raw => "raw",
			CommandKind::Cwd => "cwd",
		};
		write!(f, "{}", name)
	}
}

/// Directory listing behavior flags. Independent bits, any combination valid.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ListFlags(u32);

impl ListFlags {
	/// Request a fresh listing even when the cache could satisfy it
	pub const REFRESH: ListFlags = ListFlags(0x01);
	/// List only when the cache cannot satisfy the request
	pub const AVOID_CACHE: ListFlags = ListFlags(0x02);
	/// On a failed directory change, list the current directory instead
	pub const FALLBACK_CURRENT: ListFlags = ListFlags(0x04);
	/// Symlink discovery listing
	pub const LINK: ListFlags = ListFlags(0x08);
	/// Drop all cached listings for the server first
	pub const CLEAR_CACHE: ListFlags = ListFlags(0x10);

	pub fn empty() -> Self {
		ListFlags(0)
	}

	pub fn contains(self, flag: ListFlags) -> bool {
		self.0 & flag.0 == flag.0
	}
}

impl BitOr for ListFlags {
	type Output = ListFlags;

	fn bitor(self, rhs: ListFlags) -> ListFlags {
		ListFlags(self.0 | rhs.0)
	}
}

/// Transfer behavior flags
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TransferFlags(u32);

impl TransferFlags {
	/// Remote to local; without it the transfer is an upload
	pub const DOWNLOAD: TransferFlags = TransferFlags(0x01);
	/// Flush local file data before reporting completion
	pub const FSYNC: TransferFlags = TransferFlags(0x02);

	pub fn empty() -> Self {
		TransferFlags(0)
	}

	pub fn contains(self, flag: TransferFlags) -> bool {
		self.0 & flag.0 == flag.0
	}
}

impl BitOr for TransferFlags {
	type Output = TransferFlags;

	fn bitor(self, rhs: TransferFlags) -> TransferFlags {
		TransferFlags(self.0 | rhs.0)
	}
}

/// The local side of a transfer was already handed out once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadConsumed;

impl fmt::Display for PayloadConsumed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "transfer payload already consumed")
	}
}

impl Error for PayloadConsumed {}

/// Single-use handle to the local side of a transfer.
///
/// The handle can be extracted exactly once. Cloning a command whose payload
/// was already consumed yields a slot that reports [`PayloadConsumed`] instead
/// of silently re-reading user input.
#[derive(Clone, Debug)]
pub struct PayloadSlot {
	local: Option<PathBuf>,
}

impl PayloadSlot {
	pub fn new(local: PathBuf) -> Self {
		PayloadSlot { local: Some(local) }
	}

	/// Extract the handle. Fails on the second call.
	pub fn take(&mut self) -> Result<PathBuf, PayloadConsumed> {
		self.local.take().ok_or(PayloadConsumed)
	}

	pub fn consumed(&self) -> bool {
		self.local.is_none()
	}
}

/// One requested action, tagged by kind
#[derive(Clone, Debug)]
pub enum Command {
	Connect { server: Server, credentials: Credentials, retry_connecting: bool },
	Disconnect,
	List { path: Option<RemotePath>, subdir: String, flags: ListFlags },
	Transfer { payload: PayloadSlot, remote_path: RemotePath, remote_file: String, flags: TransferFlags },
	Delete { path: RemotePath, files: Vec<String> },
	RemoveDir { path: RemotePath, subdir: String },
	Mkdir { path: RemotePath },
	Rename { from_path: RemotePath, from_file: String, to_path: RemotePath, to_file: String },
	Chmod { path: RemotePath, file: String, permission: String },
	Raw { line: String },
	Cwd { path: RemotePath },
}

impl Command {
	/// Identity tag of this command
	pub fn kind(&self) -> CommandKind {
		match self {
			Command::Connect { .. } => CommandKind::Connect,
			Command::Disconnect => CommandKind::Disconnect,
			Command::List { .. } => CommandKind::List,
			Command::Transfer { .. } => CommandKind::Transfer,
			Command::Delete { .. } => CommandKind::Delete,
			Command::RemoveDir { .. } => CommandKind::RemoveDir,
			Command::Mkdir { .. } => CommandKind::Mkdir,
			Command::Rename { .. } => CommandKind::Rename,
			Command::Chmod { .. } => CommandKind::Chmod,
			Command::Raw { .. } => CommandKind::Raw,
			Command::Cwd { .. } => CommandKind::Cwd,
		}
	}

	/// Kind-specific required-field rule. Checked once at admission.
	pub fn valid(&self) -> bool {
		match self {
			Command::Connect { server, credentials, .. } => {
				!server.host.is_empty() && !credentials.user.is_empty()
			}
			Command::Disconnect => true,
			// No path means the current directory; any flag combination is valid
			Command::List { .. } => true,
			Command::Transfer { remote_path, remote_file, .. } => {
				!remote_path.is_empty() && !remote_file.is_empty()
			}
			Command::Delete { path, files } => {
				!path.is_empty() && !files.is_empty() && files.iter().all(|f| !f.is_empty())
			}
			Command::RemoveDir { path, .. } => !path.is_empty(),
			Command::Mkdir { path } => !path.is_empty() && !path.is_root(),
			Command::Rename { from_path, from_file, to_path, to_file } => {
				!from_path.is_empty()
					&& !from_file.is_empty()
					&& !to_path.is_empty()
					&& !to_file.is_empty()
			}
			Command::Chmod { path, file, permission } => {
				!path.is_empty() && !file.is_empty() && !permission.is_empty()
			}
			Command::Raw { line } => !line.is_empty(),
			Command::Cwd { path } => !path.is_empty(),
		}
	}
}


// vim: ts=4
