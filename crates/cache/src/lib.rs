//! Local snapshot of the book collection.
//!
//! This crate provides the best-effort cache that mirrors the last collection
//! successfully fetched from the remote repository. The cache is not the
//! source of truth - the remote repository is. If the cache is wiped, the
//! next successful load simply rebuilds it.
//!
//! # Layout
//! Everything lives in a [`KeyValueStore`](shelf_storage::KeyValueStore)
//! under three namespaced keys (see [`CacheKeys`]):
//! - **books**: the whole collection as a JSON array, overwritten on every save,
//! - **last_sync**: RFC 3339 timestamp of the last save,
//! - **sync_pending**: `"true"`/`"false"` marker.
//!
//! Nothing in the public API returns an error: failures are logged and
//! reported as "nothing cached".

mod cache;
pub mod error;
mod models;

pub use crate::cache::{CacheKeys, DEFAULT_NAMESPACE, LocalCache, Snapshot};
