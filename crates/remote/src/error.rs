//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use shelf_model::BookId;

/// A remote error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Everything except [`NotFound`](Self::NotFound) and
/// [`InvalidConfig`](Self::InvalidConfig) is a transient fetch failure: the
/// request may well succeed next time.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Connection could not be established or was dropped
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// Transport-level timeout elapsed
    #[display("request timed out")]
    Timeout,
    /// The server answered with a non-2xx status
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// The server has no book with this id
    #[display("book not found: {_0}")]
    NotFound(#[error(not(source))] BookId),
    /// The response body didn't have the expected shape
    #[display("could not decode response body")]
    Decode,
    /// Client could not be built from the given settings
    #[display("invalid client configuration: {_0}")]
    InvalidConfig(#[error(not(source))] String),
}
impl From<&reqwest::Error> for ErrorKind {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::Decode => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::NotFound(_) | Self::InvalidConfig(_) => false,
        }
    }
}

/// Wrap a [`reqwest::Error`] in the matching [`ErrorKind`], keeping the
/// original error as a child in the error tree.
#[track_caller]
pub(crate) fn transport(err: reqwest::Error) -> Error {
    let kind = ErrorKind::from(&err);
    exn::Exn::from(err).raise(kind)
}
