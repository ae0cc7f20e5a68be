//! The book tracker's application layer.
//!
//! [`Library`] ties the remote repository, the bibliographic lookup and the
//! local cache together. The remaining modules are pure: [`view`] derives the
//! filtered and sorted list a screen shows, [`stats`] summarises a collection.
//! [`ThemePreference`] holds the persisted light/dark choice and is handed to
//! whatever renders.

pub mod error;
mod library;
mod loader;
pub mod stats;
mod theme;
pub mod view;

pub use crate::library::Library;
pub use crate::loader::CollectionLoader;
pub use crate::stats::{Statistics, aggregate};
pub use crate::theme::{ThemeMode, ThemePreference};
pub use crate::view::{Filter, SortKey, ViewQuery, derive_view};
