//! Remote path value object
//!
//! Paths on the server side are always absolute and `/`-separated, independent
//! of the local platform. A `RemotePath` is either empty (unset) or a
//! normalized absolute path; filename spelling for outbound protocol lines is
//! produced by [`RemotePath::format_filename`], which is where the
//! relative-vs-absolute addressing decision of the operations surfaces.

use std::fmt;

/// Absolute path on the remote server, or the empty (unset) path
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RemotePath {
	inner: String,
}

impl RemotePath {
	/// The unset path. Commands carrying it fail validation.
	pub fn empty() -> Self {
		RemotePath { inner: String::new() }
	}

	/// The server root
	pub fn root() -> Self {
		RemotePath { inner: "/".to_string() }
	}

	/// Parse and normalize. Input is taken to be absolute; `.` segments and
	/// duplicate separators collapse, `..` pops. An empty input stays empty.
	pub fn new(path: &str) -> Self {
		if path.is_empty() {
			return Self::empty();
		}

		let mut segments: Vec<&str> = Vec::new();
		for segment in path.split('/') {
			match segment {
				"" | "." => {}
				".." => {
					segments.pop();
				}
				s => segments.push(s),
			}
		}

		if segments.is_empty() {
			Self::root()
		} else {
			RemotePath { inner: format!("/{}", segments.join("/")) }
		}
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn is_root(&self) -> bool {
		self.inner == "/"
	}

	pub fn as_str(&self) -> &str {
		&self.inner
	}

	/// Append one segment
	pub fn join(&self, segment: &str) -> RemotePath {
		if segment.is_empty() {
			return self.clone();
		}
		if self.is_empty() {
			return Self::new(segment);
		}
		Self::new(&format!("{}/{}", self.inner, segment))
	}

	/// Containing directory, None at the root or when unset
	pub fn parent(&self) -> Option<RemotePath> {
		if self.is_empty() || self.is_root() {
			return None;
		}
		match self.inner.rfind('/') {
			Some(0) => Some(Self::root()),
			Some(pos) => Some(RemotePath { inner: self.inner[..pos].to_string() }),
			None => None,
		}
	}

	/// Last path segment, None at the root or when unset
	pub fn name(&self) -> Option<&str> {
		if self.is_empty() || self.is_root() {
			return None;
		}
		self.inner.rfind('/').map(|pos| &self.inner[pos + 1..])
	}

	/// Spell a file inside this directory for an outbound protocol line.
	///
	/// With `relative` the bare name is used, counting on the session's
	/// working directory; otherwise the fully-qualified form.
	pub fn format_filename(&self, file: &str, relative: bool) -> String {
		if relative {
			file.to_string()
		} else if self.is_root() {
			format!("/{}", file)
		} else {
			format!("{}/{}", self.inner, file)
		}
	}
}

impl fmt::Display for RemotePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.inner)
	}
}


// vim: ts=4
