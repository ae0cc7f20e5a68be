//! Key-value store trait and implementations.
//!
//! This module defines the `KeyValueStore` trait, the small persistence
//! capability everything local goes through (book snapshot, sync markers,
//! theme preference), plus the filesystem and in-memory implementations.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalStore;
#[cfg(feature = "mock")]
pub use self::mock::MockStore;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for local key-value persistence.
///
/// Values are UTF-8 strings, usually JSON. All operations are asynchronous so
/// that slow media never block the caller's executor.
///
/// # Keys
/// Keys must pass [`validate_key`](crate::validate_key). Implementations
/// should enforce this validation.
///
/// # Examples
///
/// ```
/// use shelf_storage::{KeyValueStore, error::Result};
///
/// async fn bump_launch_count(store: &dyn KeyValueStore) -> Result<u64> {
///     let count = match store.get("launches").await? {
///         Some(v) => v.parse::<u64>().unwrap_or(0) + 1,
///         None => 1,
///     };
///     store.set("launches", &count.to_string()).await?;
///     Ok(count)
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Name of the configured store (used for logging only).
    fn name(&self) -> &str;

    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored; that is not an error.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every key in `keys`.
    ///
    /// Keys that aren't present are skipped silently. Stops at the first
    /// failure; keys removed before it stay removed.
    async fn remove(&self, keys: &[&str]) -> Result<()>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation fetches the value and discards it.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
