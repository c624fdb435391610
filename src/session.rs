//! Session: the serialized execution context one engine drives
//!
//! A session owns the transport, the shared directory cache handle, the
//! status sink and the working-directory tracking. All protocol exchanges of
//! all operations in a session funnel through [`Session::exchange`], which is
//! where transport failures become reply codes. One session is strictly
//! sequential; concurrency only exists across independent sessions.

use std::sync::Arc;
use uuid::Uuid;

use crate::cache::DirectoryCache;
use crate::logging::*;
use crate::path::RemotePath;
use crate::reply::ReplyCode;
use crate::transport::Transport;
use crate::types::{Credentials, MessageLevel, Server};

pub struct Session {
	id: Uuid,
	server: Server,
	transport: Box<dyn Transport>,
	cache: Arc<dyn DirectoryCache>,
	status: Box<dyn StatusSink>,
	current_dir: Option<RemotePath>,
}

impl Session {
	pub fn new(
		server: Server,
		transport: Box<dyn Transport>,
		cache: Arc<dyn DirectoryCache>,
		status: Box<dyn StatusSink>,
	) -> Self {
		let id = Uuid::new_v4();
		debug!("session {} created for {}", id, server);
		Session { id, server, transport, cache, status, current_dir: None }
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn server(&self) -> &Server {
		&self.server
	}

	pub fn is_connected(&self) -> bool {
		self.transport.is_connected()
	}

	/// Establish the session against `server`. A connect while connected is
	/// rejected, the caller has to disconnect first.
	pub async fn connect(&mut self, server: Server, credentials: &Credentials) -> ReplyCode {
		if self.transport.is_connected() {
			return ReplyCode::ALREADY_CONNECTED;
		}

		self.server = server;
		self.current_dir = None;
		self.status(MessageLevel::Status, &format!("Connecting to {}...", self.server));

		match self.transport.connect(&self.server, credentials).await {
			Ok(code) => {
				if code.is_error() {
					warn!("session {}: connect failed: {}", self.id, code);
				}
				code
			}
			Err(e) => {
				warn!("session {}: connect failed: {}", self.id, e);
				e.to_reply()
			}
		}
	}

	/// Tear the session down. Disconnecting an idle session is a no-op.
	pub async fn disconnect(&mut self) -> ReplyCode {
		self.current_dir = None;
		if let Err(e) = self.transport.close().await {
			debug!("session {}: close reported {}", self.id, e);
		}
		ReplyCode::OK
	}

	/// One serialized protocol round trip. The sole I/O suspension point of
	/// the driver loop.
	pub async fn exchange(&mut self, line: &str) -> ReplyCode {
		if !self.transport.is_connected() {
			return ReplyCode::NOT_CONNECTED;
		}

		debug!("session {} -> {}", self.id, line);
		match self.transport.exchange(line).await {
			Ok(reply) => {
				if let Some(message) = &reply.message {
					debug!("session {} <- {} ({})", self.id, reply.code, message);
				} else {
					debug!("session {} <- {}", self.id, reply.code);
				}
				reply.code
			}
			Err(e) => {
				warn!("session {}: exchange failed: {}", self.id, e);
				e.to_reply()
			}
		}
	}

	/// Emit a leveled user-facing status message
	pub fn status(&self, level: MessageLevel, text: &str) {
		self.status.message(level, text);
	}

	pub fn cache(&self) -> &dyn DirectoryCache {
		&*self.cache
	}

	pub fn current_dir(&self) -> Option<&RemotePath> {
		self.current_dir.as_ref()
	}

	pub fn set_current_dir(&mut self, dir: RemotePath) {
		self.current_dir = Some(dir);
	}

	pub fn clear_current_dir(&mut self) {
		self.current_dir = None;
	}
}


// vim: ts=4
