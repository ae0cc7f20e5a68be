//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Key is empty or contains characters no store can represent
    #[display("invalid key: {_0:?}")]
    InvalidKey(#[error(not(source))] String),
    /// Store root is not an absolute path
    #[display("invalid store root: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// Access denied on the underlying medium
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Stored bytes are not valid UTF-8
    #[display("stored value for {_0:?} is not valid UTF-8")]
    Encoding(#[error(not(source))] String),
    /// The store cannot be reached at all right now
    #[display("store unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }
}
