//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the lower crates are
//! kept as children in the tree; match on the top-level [`ErrorKind`] to
//! decide what to show the user.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The remote fetch failed and nothing usable was cached.
    #[display("collection unavailable: remote fetch failed and no cached copy exists")]
    CollectionUnavailable,
    /// Input was rejected before anything was sent to the repository.
    #[display("invalid input")]
    Validation,
    /// The repository refused or failed a create/update/delete.
    #[display("could not {_0} book")]
    Mutation(#[error(not(source))] &'static str),
    /// Loading a book by id failed.
    #[display("could not fetch book")]
    Fetch,
    /// The library could not be wired up from its configuration.
    #[display("could not set up the library from configuration")]
    Setup,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CollectionUnavailable | Self::Mutation(_) | Self::Fetch => true,
            Self::Validation | Self::Setup => false,
        }
    }
}
