use crate::error::{ErrorKind, Result};
use crate::models::BookProxy;
use exn::ResultExt;
use facet_json::{from_str as from_json, to_string as to_json};
use shelf_model::Book;
use shelf_storage::StoreHandle;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@booklist_app";

/// The fully-qualified keys a [`LocalCache`] owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    pub books: String,
    pub last_sync: String,
    pub sync_pending: String,
}
impl CacheKeys {
    pub fn new(namespace: impl AsRef<str>) -> Self {
        let ns = namespace.as_ref();
        Self {
            books: format!("{ns}:books"),
            last_sync: format!("{ns}:last_sync"),
            sync_pending: format!("{ns}:sync_pending"),
        }
    }

    fn all(&self) -> [&str; 3] {
        [&self.books, &self.last_sync, &self.sync_pending]
    }
}
impl Default for CacheKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// The cached collection together with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    /// `None` when the books were written but stamping the time failed.
    pub saved_at: Option<OffsetDateTime>,
}

/// Best-effort mirror of the last successfully loaded collection.
///
/// Holds at most one snapshot: every [`save_books()`](Self::save_books)
/// replaces the previous one wholesale. No method returns an error; store
/// failures are logged and then treated as "nothing cached".
#[derive(Clone)]
pub struct LocalCache {
    store: StoreHandle,
    keys: CacheKeys,
}
impl LocalCache {
    pub fn new(store: StoreHandle, namespace: impl AsRef<str>) -> Self {
        Self {
            store,
            keys: CacheKeys::new(namespace),
        }
    }

    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Replace the cached collection and stamp the current time as last-sync.
    pub async fn save_books(&self, books: &[Book]) {
        match self.try_save_books(books).await {
            Ok(()) => tracing::info!(store = self.store.name(), books = books.len(), "Books saved to local cache"),
            Err(e) => tracing::error!(store = self.store.name(), error = ?e, "Error saving books to local cache"),
        }
    }

    async fn try_save_books(&self, books: &[Book]) -> Result<()> {
        let proxies = books.iter().map(BookProxy::try_from).collect::<Result<Vec<_>>>()?;
        let json = to_json(&proxies).or_raise(|| ErrorKind::InvalidData("books"))?;
        self.store.set(&self.keys.books, &json).await.or_raise(|| ErrorKind::Store)?;
        let now = OffsetDateTime::now_utc().format(&Rfc3339).or_raise(|| ErrorKind::InvalidData("last sync"))?;
        self.store.set(&self.keys.last_sync, &now).await.or_raise(|| ErrorKind::Store)?;
        Ok(())
    }

    /// The cached collection, or `None` when nothing usable is cached.
    pub async fn load_books(&self) -> Option<Vec<Book>> {
        match self.try_load_books().await {
            Ok(Some(books)) => {
                tracing::info!(store = self.store.name(), books = books.len(), "Books loaded from local cache");
                Some(books)
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!(store = self.store.name(), error = ?e, "Error loading books from local cache");
                None
            },
        }
    }

    async fn try_load_books(&self) -> Result<Option<Vec<Book>>> {
        let Some(json) = self.store.get(&self.keys.books).await.or_raise(|| ErrorKind::Store)? else {
            return Ok(None);
        };
        let proxies = from_json::<Vec<BookProxy>>(&json).or_raise(|| ErrorKind::InvalidData("books"))?;
        let books = proxies.into_iter().map(Book::try_from).collect::<Result<Vec<_>>>()?;
        Ok(Some(books))
    }

    /// Cached collection and its save time, read together.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let books = self.load_books().await?;
        let saved_at = self.last_sync().await;
        Some(Snapshot { books, saved_at })
    }

    // =========================================================================
    // Sync markers
    // =========================================================================

    /// When the collection was last saved, if ever.
    pub async fn last_sync(&self) -> Option<OffsetDateTime> {
        let raw = match self.store.get(&self.keys.last_sync).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(store = self.store.name(), error = ?e, "Error getting last sync");
                return None;
            },
        };
        match OffsetDateTime::parse(&raw, &Rfc3339) {
            Ok(at) => Some(at),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring unparsable last sync timestamp");
                None
            },
        }
    }

    /// Whether a sync has been flagged as pending. Defaults to `false`.
    pub async fn has_pending_sync(&self) -> bool {
        match self.store.get(&self.keys.sync_pending).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::error!(store = self.store.name(), error = ?e, "Error checking pending sync");
                false
            },
        }
    }

    pub async fn set_pending_sync(&self, pending: bool) {
        let value = if pending { "true" } else { "false" };
        if let Err(e) = self.store.set(&self.keys.sync_pending, value).await {
            tracing::error!(store = self.store.name(), error = ?e, "Error setting pending sync");
        }
    }

    /// Remove every key this cache owns. Keys outside the namespace are
    /// left alone.
    pub async fn clear_all(&self) {
        match self.store.remove(&self.keys.all()).await {
            Ok(()) => tracing::info!(store = self.store.name(), "Local cache cleared"),
            Err(e) => tracing::error!(store = self.store.name(), error = ?e, "Error clearing local cache"),
        }
    }
}
