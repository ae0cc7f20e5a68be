//! Model Error Types
//!
//! Validation failures raised before anything is sent to the remote
//! repository. Uses `exn` for automatic location tracking and error tree
//! construction, like every other crate in the workspace.

use derive_more::{Display, Error};

/// A validation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// All of these are user-correctable: fix the input and submit again.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Title or author was blank after trimming.
    #[display("title and author are required")]
    MissingTitleOrAuthor,
    /// Year was present but not exactly four digits.
    #[display("year must use the YYYY format, found: {_0}")]
    InvalidYear(#[error(not(source))] String),
    /// Rating outside of `0..=5`.
    #[display("rating must be between 0 and 5, found: {_0}")]
    InvalidRating(#[error(not(source))] u8),
    /// The book was never assigned an id by the remote repository.
    #[display("book has no server-assigned id")]
    MissingId,
    /// Note content was blank after trimming.
    #[display("note content must not be empty")]
    EmptyNote,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Same input, same answer.
        false
    }
}
