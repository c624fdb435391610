//! Transport collaborators: one line out, one reply back
//!
//! The engine requires only this contract from a transport: accept one
//! composed protocol line at a time and deliver exactly one reply per
//! accepted line, in submission order. [`ProcessTransport`] speaks the line
//! protocol to a helper child process over its stdin/stdout;
//! [`ScriptedTransport`] replays queued replies in-memory for tests and dry
//! runs. Timeouts are owned here, never by the operations.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::TransportError;
use crate::logging::*;
use crate::reply::ReplyCode;
use crate::types::{Credentials, Server};

/// Outcome of one exchange: the reply code plus an optional server message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
	pub code: ReplyCode,
	pub message: Option<String>,
}

impl TransportReply {
	pub fn new(code: ReplyCode) -> Self {
		TransportReply { code, message: None }
	}

	pub fn with_message(code: ReplyCode, message: &str) -> Self {
		TransportReply { code, message: Some(message.to_string()) }
	}
}

/// Ordered, one-at-a-time command/reply exchange with the remote side
#[async_trait]
pub trait Transport: Send {
	/// Establish the session. Returns the server's verdict as a reply code
	/// (e.g. password-failed) rather than an error when the transport itself
	/// worked.
	async fn connect(
		&mut self,
		server: &Server,
		credentials: &Credentials,
	) -> Result<ReplyCode, TransportError>;

	/// Send one protocol line and await its reply
	async fn exchange(&mut self, line: &str) -> Result<TransportReply, TransportError>;

	/// Tear the session down
	async fn close(&mut self) -> Result<(), TransportError>;

	fn is_connected(&self) -> bool;
}

/// One wire reply line: `{rc: <bits>, msg: "..."}`
#[derive(Deserialize)]
struct ReplyLine {
	rc: u32,
	#[serde(default)]
	msg: Option<String>,
}

/// Parse one reply line. Reply codes carrying engine-internal bits are a
/// protocol violation, they cannot come from outside.
pub(crate) fn parse_reply_line(line: &str) -> Result<TransportReply, TransportError> {
	let parsed: ReplyLine = json5::from_str(line).map_err(|e| TransportError::ProtocolViolation {
		message: format!("bad reply line '{}': {}", line, e),
	})?;

	let code = ReplyCode::from_bits(parsed.rc);
	if code.has_internal_bits() {
		return Err(TransportError::ProtocolViolation {
			message: format!("reply carries internal bits: {}", code),
		});
	}

	Ok(TransportReply { code, message: parsed.msg })
}

/// Line protocol over a helper child process
///
/// The helper owns the actual server connection and replies with one JSON5
/// line per command. Lines starting with `#` or `!` are helper trace output
/// and are skipped.
pub struct ProcessTransport {
	program: String,
	args: Vec<String>,
	timeout: Duration,
	child: Option<tokio::process::Child>,
	send: Option<tokio::process::ChildStdin>,
	recv: Option<BufReader<tokio::process::ChildStdout>>,
	connected: bool,
}

impl ProcessTransport {
	pub fn new(program: &str, args: Vec<String>, timeout: Duration) -> Self {
		ProcessTransport {
			program: program.to_string(),
			args,
			timeout,
			child: None,
			send: None,
			recv: None,
			connected: false,
		}
	}

	fn spawn(&mut self) -> Result<(), TransportError> {
		let mut child = tokio::process::Command::new(&self.program)
			.args(&self.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.spawn()
			.map_err(|e| TransportError::SpawnFailed { cmd: self.program.clone(), source: e })?;

		let send = child
			.stdin
			.take()
			.ok_or(TransportError::StdioUnavailable { what: "stdin".to_string() })?;
		let stdout = child
			.stdout
			.take()
			.ok_or(TransportError::StdioUnavailable { what: "stdout".to_string() })?;

		self.send = Some(send);
		self.recv = Some(BufReader::new(stdout));
		self.child = Some(child);
		Ok(())
	}

	async fn exchange_line(&mut self, line: &str) -> Result<TransportReply, TransportError> {
		let send = self.send.as_mut().ok_or(TransportError::NotConnected)?;
		let recv = self.recv.as_mut().ok_or(TransportError::NotConnected)?;

		send.write_all(line.as_bytes()).await?;
		send.write_all(b"\n").await?;
		send.flush().await?;

		let mut buf = String::new();
		loop {
			buf.clear();
			let n = tokio::time::timeout(self.timeout, recv.read_line(&mut buf))
				.await
				.map_err(|_| TransportError::Timeout)??;
			if n == 0 {
				self.connected = false;
				return Err(TransportError::Disconnected);
			}

			let reply = buf.trim();
			if reply.is_empty() || reply.starts_with('#') || reply.starts_with('!') {
				debug!("helper trace: {}", reply);
				continue;
			}

			return parse_reply_line(reply);
		}
	}
}

#[async_trait]
impl Transport for ProcessTransport {
	async fn connect(
		&mut self,
		server: &Server,
		credentials: &Credentials,
	) -> Result<ReplyCode, TransportError> {
		self.spawn()?;

		let open = format!("open {} {} {}", server.host, server.port, credentials.user);
		let reply = self.exchange_line(&open).await?;
		if reply.code.is_error() {
			return Ok(reply.code);
		}

		// Password travels over the child pipe only, never through logging
		let pass = format!("pass {}", credentials.password);
		let reply = self.exchange_line(&pass).await?;
		if !reply.code.is_error() {
			self.connected = true;
		}
		Ok(reply.code)
	}

	async fn exchange(&mut self, line: &str) -> Result<TransportReply, TransportError> {
		if !self.connected {
			return Err(TransportError::NotConnected);
		}
		self.exchange_line(line).await
	}

	async fn close(&mut self) -> Result<(), TransportError> {
		self.connected = false;
		if let Some(send) = self.send.as_mut() {
			// Best effort, the child may already be gone
			let _ = send.write_all(b"quit\n").await;
			let _ = send.flush().await;
		}
		if let Some(mut child) = self.child.take() {
			let _ = child.kill().await;
		}
		self.send = None;
		self.recv = None;
		Ok(())
	}

	fn is_connected(&self) -> bool {
		self.connected
	}
}

/// Shared log of the lines a scripted transport was asked to send
pub type SentLog = Arc<Mutex<Vec<String>>>;

/// In-memory transport replaying queued replies in FIFO order
#[derive(Default)]
pub struct ScriptedTransport {
	replies: VecDeque<TransportReply>,
	sent: SentLog,
	connected: bool,
	connect_reply: Option<ReplyCode>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue the reply for the next exchange
	pub fn push_reply(&mut self, code: ReplyCode) {
		self.replies.push_back(TransportReply::new(code));
	}

	pub fn push_reply_with_message(&mut self, code: ReplyCode, message: &str) {
		self.replies.push_back(TransportReply::with_message(code, message));
	}

	/// Reply the next connect attempt gets instead of plain ok
	pub fn set_connect_reply(&mut self, code: ReplyCode) {
		self.connect_reply = Some(code);
	}

	/// Handle on the sent-line log, usable after the engine takes ownership
	pub fn sent_log(&self) -> SentLog {
		Arc::clone(&self.sent)
	}
}

#[async_trait]
impl Transport for ScriptedTransport {
	async fn connect(
		&mut self,
		_server: &Server,
		_credentials: &Credentials,
	) -> Result<ReplyCode, TransportError> {
		let code = self.connect_reply.take().unwrap_or(ReplyCode::OK);
		if !code.is_error() {
			self.connected = true;
		}
		Ok(code)
	}

	async fn exchange(&mut self, line: &str) -> Result<TransportReply, TransportError> {
		if !self.connected {
			return Err(TransportError::NotConnected);
		}
		self.sent.lock().expect("sent log lock poisoned").push(line.to_string());
		self.replies.pop_front().ok_or(TransportError::ProtocolViolation {
			message: format!("no scripted reply for '{}'", line),
		})
	}

	async fn close(&mut self) -> Result<(), TransportError> {
		self.connected = false;
		Ok(())
	}

	fn is_connected(&self) -> bool {
		self.connected
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_reply_line() {
		let reply = parse_reply_line("{rc: 0}").unwrap();
		assert!(reply.code.is_ok());
		assert_eq!(reply.message, None);

		let reply = parse_reply_line("{rc: 6, msg: \"permission denied\"}").unwrap();
		assert_eq!(reply.code, ReplyCode::CRITICAL_ERROR);
		assert_eq!(reply.message.as_deref(), Some("permission denied"));
	}

	#[test]
	fn test_parse_reply_line_rejects_garbage() {
		assert!(parse_reply_line("not json").is_err());
		assert!(parse_reply_line("{msg: \"no code\"}").is_err());
	}

	#[test]
	fn test_parse_reply_line_rejects_internal_bits() {
		// 0x8000 is the engine-internal continue bit
		let result = parse_reply_line("{rc: 32768}");
		match result {
			Err(TransportError::ProtocolViolation { .. }) => {}
			other => panic!("expected protocol violation, got {:?}", other.map(|r| r.code)),
		}
	}

	#[tokio::test]
	async fn test_scripted_transport_fifo_order() {
		let mut transport = ScriptedTransport::new();
		transport.push_reply(ReplyCode::OK);
		transport.push_reply(ReplyCode::ERROR);
		let log = transport.sent_log();

		let server = Server::new("h", 22);
		let creds = Credentials::new("u", "p");
		assert_eq!(transport.connect(&server, &creds).await.unwrap(), ReplyCode::OK);

		assert_eq!(transport.exchange("first").await.unwrap().code, ReplyCode::OK);
		assert_eq!(transport.exchange("second").await.unwrap().code, ReplyCode::ERROR);
		assert_eq!(*log.lock().unwrap(), vec!["first".to_string(), "second".to_string()]);
	}

	#[tokio::test]
	async fn test_scripted_transport_requires_connect() {
		let mut transport = ScriptedTransport::new();
		transport.push_reply(ReplyCode::OK);
		match transport.exchange("ls /").await {
			Err(TransportError::NotConnected) => {}
			other => panic!("expected NotConnected, got {:?}", other.map(|r| r.code)),
		}
	}

	#[tokio::test]
	async fn test_scripted_transport_exhausted_script_is_violation() {
		let mut transport = ScriptedTransport::new();
		let server = Server::new("h", 22);
		let creds = Credentials::new("u", "p");
		transport.connect(&server, &creds).await.unwrap();
		assert!(matches!(
			transport.exchange("ls /").await,
			Err(TransportError::ProtocolViolation { .. })
		));
	}
}

// vim: ts=4
