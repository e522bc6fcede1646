/* src/error.rs */

use std::io;
use std::path::{Path, PathBuf};

use crate::codec::CodecError;
use crate::lock::LockError;

/// Coarse error classes, as seen by a transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	NotFound,
	IndexOutOfRange,
	Validation,
	Decode,
	Io,
	Lock,
	Internal,
}

/// Errors returned by store operations.
///
/// A failed mutation never changes the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// The category key does not exist.
	#[error("category not found: {key}")]
	NotFound { key: String },

	/// The category exists but the index is outside `0..len`.
	#[error("index {index} out of range for category '{key}' (len {len})")]
	IndexOutOfRange { key: String, index: usize, len: usize },

	/// A record failed validation on insert or update.
	#[error("validation failed: {0}")]
	Validation(#[from] validator::ValidationErrors),

	/// The document on disk could not be decoded, or a collection could not be encoded.
	#[error("codec error on {}: {source}", path.display())]
	Codec {
		path: PathBuf,
		#[source]
		source: CodecError,
	},

	/// Filesystem failure while reading or replacing a document.
	#[error("io error on {}: {source}", path.display())]
	Io {
		kind: io::ErrorKind,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A lock could not be acquired in time.
	#[error("lock error: {0}")]
	Lock(#[from] LockError),

	/// The detached change session task did not finish.
	#[error("change session aborted: {0}")]
	Aborted(String),

	#[error("builder error: {0}")]
	Builder(String),

	#[error("config error: {0}")]
	Config(String),
}

impl StoreError {
	pub(crate) fn io(path: &Path, source: io::Error) -> Self {
		Self::Io {
			kind: source.kind(),
			path: path.to_path_buf(),
			source,
		}
	}

	pub(crate) fn codec(path: &Path, source: CodecError) -> Self {
		Self::Codec {
			path: path.to_path_buf(),
			source,
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
			Self::Validation(_) => ErrorKind::Validation,
			Self::Codec { .. } => ErrorKind::Decode,
			Self::Io { .. } => ErrorKind::Io,
			Self::Lock(_) => ErrorKind::Lock,
			Self::Aborted(_) | Self::Builder(_) | Self::Config(_) => ErrorKind::Internal,
		}
	}

	/// HTTP status a serving layer should answer with.
	pub fn status_code(&self) -> u16 {
		match self.kind() {
			ErrorKind::NotFound | ErrorKind::IndexOutOfRange => 404,
			ErrorKind::Validation => 400,
			ErrorKind::Lock => 503,
			ErrorKind::Decode | ErrorKind::Io | ErrorKind::Internal => 500,
		}
	}
}
