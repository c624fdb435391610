//! Directory/metadata cache collaborator
//!
//! The engine's contract with the cache is narrow: operations that are about
//! to change a file mark its cached attributes untrusted before the protocol
//! line is emitted, and the listing operation may consult whether a directory
//! has a trusted listing. Consistency of cached data is the cache's own
//! responsibility; the single-operation-at-a-time discipline of a session
//! means there is one writer per session.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::path::RemotePath;
use crate::types::{AttributeState, Server};

/// Cached attribute record for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
	pub trusted: bool,
	pub state: AttributeState,
}

/// Cache collaborator interface, write-mostly from the engine's perspective
pub trait DirectoryCache: Send + Sync {
	/// Update-or-invalidate one file's cached attributes
	fn update_file(
		&self,
		server: &Server,
		path: &RemotePath,
		file: &str,
		trusted: bool,
		state: AttributeState,
	);

	/// Record that a directory listing was delivered by the server
	fn mark_dir_listed(&self, server: &Server, path: &RemotePath);

	/// True if the cache holds a trusted listing for the directory
	fn dir_is_trusted(&self, server: &Server, path: &RemotePath) -> bool;

	/// Drop every cached listing for the server
	fn clear(&self, server: &Server);
}

#[derive(Debug, Default)]
struct DirState {
	listed: bool,
	files: HashMap<String, CacheEntry>,
}

/// In-memory cache keyed by server and directory
#[derive(Default)]
pub struct MemoryCache {
	dirs: Mutex<HashMap<(String, String), DirState>>,
}

impl MemoryCache {
	pub fn new() -> Self {
		Self::default()
	}

	fn key(server: &Server, path: &RemotePath) -> (String, String) {
		(server.key(), path.as_str().to_string())
	}

	/// Current record for one file, None if never cached
	pub fn file_entry(&self, server: &Server, path: &RemotePath, file: &str) -> Option<CacheEntry> {
		let dirs = self.dirs.lock().expect("cache lock poisoned");
		dirs.get(&Self::key(server, path)).and_then(|dir| dir.files.get(file)).cloned()
	}
}

impl DirectoryCache for MemoryCache {
	fn update_file(
		&self,
		server: &Server,
		path: &RemotePath,
		file: &str,
		trusted: bool,
		state: AttributeState,
	) {
		let mut dirs = self.dirs.lock().expect("cache lock poisoned");
		let dir = dirs.entry(Self::key(server, path)).or_default();
		dir.files.insert(file.to_string(), CacheEntry { trusted, state });
	}

	fn mark_dir_listed(&self, server: &Server, path: &RemotePath) {
		let mut dirs = self.dirs.lock().expect("cache lock poisoned");
		dirs.entry(Self::key(server, path)).or_default().listed = true;
	}

	fn dir_is_trusted(&self, server: &Server, path: &RemotePath) -> bool {
		let dirs = self.dirs.lock().expect("cache lock poisoned");
		match dirs.get(&Self::key(server, path)) {
			Some(dir) => dir.listed && dir.files.values().all(|entry| entry.trusted),
			None => false,
		}
	}

	fn clear(&self, server: &Server) {
		let mut dirs = self.dirs.lock().expect("cache lock poisoned");
		let server_key = server.key();
		dirs.retain(|(key, _), _| *key != server_key);
	}
}


// vim: ts=4
