//! # xferr - Remote Filesystem Transfer Client Engine
//!
//! xferr is the command-execution core of a file-transfer client: it turns a
//! validated command (list, transfer, delete, rename, chmod, ...) into a
//! multi-step operation state machine driven over a single serialized
//! session, one protocol exchange in flight at a time. Operations may
//! delegate prerequisites to nested operations (directory positioning before
//! a permissions change) and apply fallback policies when a prerequisite
//! fails (absolute-path addressing after a rejected directory change).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use xferr::cache::MemoryCache;
//! use xferr::command::Command;
//! use xferr::engine::Engine;
//! use xferr::logging::TracingStatusSink;
//! use xferr::path::RemotePath;
//! use xferr::session::Session;
//! use xferr::transport::ProcessTransport;
//! use xferr::types::{Credentials, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new("files.example.com", 22);
//!     let transport = ProcessTransport::new("xferr-agent", vec![], std::time::Duration::from_secs(30));
//!     let session = Session::new(
//!         server.clone(),
//!         Box::new(transport),
//!         Arc::new(MemoryCache::new()),
//!         Box::new(TracingStatusSink),
//!     );
//!     let mut engine = Engine::new(session);
//!
//!     engine.execute(Command::Connect {
//!         server,
//!         credentials: Credentials::new("alice", "secret"),
//!         retry_connecting: true,
//!     }).await;
//!     let code = engine.execute(Command::Chmod {
//!         path: RemotePath::new("/home/alice"),
//!         file: "notes.txt".to_string(),
//!         permission: "600".to_string(),
//!     }).await;
//!     println!("chmod: {}", code);
//! }
//! ```

pub mod cache;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod ops;
pub mod path;
pub mod reply;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use command::{Command, CommandKind, ListFlags, PayloadSlot, TransferFlags};
pub use config::EngineConfig;
pub use engine::{CancelHandle, Engine};
pub use error::{ConfigError, TransportError};
pub use path::RemotePath;
pub use reply::ReplyCode;
pub use session::Session;
pub use types::{AttributeState, Credentials, MessageLevel, Server};

// vim: ts=4
