//! Clients for the two remote collaborators of the library: the book
//! repository that owns every record, and the bibliographic service used to
//! look up edition counts.
//!
//! Both are expressed as traits ([`BookRepository`], [`EditionLookup`]) so the
//! rest of the workspace never talks HTTP directly. The repository speaks the
//! wire shape ([`RemoteBook`](shelf_model::RemoteBook)); mapping into
//! [`Book`](shelf_model::Book) is the caller's job.

pub mod error;
pub mod lookup;
pub mod repository;

pub use crate::lookup::EditionLookup;
pub use crate::repository::BookRepository;
use std::sync::Arc;

pub type RepositoryHandle = Arc<dyn BookRepository + Send + Sync>;
pub type LookupHandle = Arc<dyn EditionLookup + Send + Sync>;

#[cfg(test)]
mod testing;
