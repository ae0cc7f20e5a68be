//! Book model for the shelf library tracker.
//!
//! Holds the canonical [`Book`] shape used by every other crate, the
//! [`RemoteBook`] wire shape spoken by the remote repository, and the boundary
//! between the two: the [flag normalizer](normalize_flag) and the
//! [mapper](crate::mapper). Nothing loosely typed crosses that boundary.

pub mod error;
mod flag;
mod form;
pub mod mapper;
pub mod models;

pub use crate::flag::normalize_flag;
pub use crate::form::BookForm;
pub use crate::mapper::{RemoteBook, RemoteNote, from_remote, normalize_books, to_remote};
pub use crate::models::{Book, BookDraft, BookId, MAX_RATING, Note};
