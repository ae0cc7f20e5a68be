//! In-memory key-value store for testing.

use crate::KeyValueStore;
use crate::error::{ErrorKind, Result};
use crate::key::validate as validate_key;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory key-value store for testing.
///
/// Values are kept in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. The store can be
/// switched [unavailable](Self::set_unavailable) at any point to simulate a
/// broken medium.
///
/// # Examples
///
/// ```
/// use shelf_storage::KeyValueStore;
/// use shelf_storage::backend::MockStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MockStore::with_entries([("theme", "dark")]);
/// assert_eq!(store.get("theme").await?.as_deref(), Some("dark"));
///
/// store.set_unavailable(true);
/// assert!(store.get("theme").await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct MockStore {
    name: String,
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MockStore {
    /// Create a mock store pre-populated with entries.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let mut map = HashMap::new();
        for (key, value) in entries {
            let key = key.into();
            if validate_key(&key).is_err() {
                // The panic here is DELIBERATE. MockStore is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockStore::with_entries: invalid key {key:?}");
            }
            map.insert(key, value.into());
        }
        Self {
            name: "mock".to_string(),
            entries: RwLock::new(map),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Change the name of the mock store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make every subsequent operation fail with [`ErrorKind::Unavailable`]
    /// (or succeed again, when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored key, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable(self.name.clone()));
        }
        Ok(())
    }
}
impl Default for MockStore {
    fn default() -> Self {
        let entries: [(&str, &str); 0] = [];
        Self::with_entries(entries)
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let key = validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let key = validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.check_available()?;
        let mut guard = self.entries.write().await;
        for key in keys {
            guard.remove(validate_key(key)?);
        }
        Ok(())
    }
}
