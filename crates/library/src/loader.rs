use crate::error::{ErrorKind, Result};
use async_stream::stream;
use futures::Stream;
use shelf_cache::LocalCache;
use shelf_model::{Book, normalize_books};
use shelf_remote::RepositoryHandle;
use tracing::instrument;

/// Fetches the collection, preferring the remote repository and falling back
/// to the last cached snapshot.
///
/// A successful remote fetch always refreshes the cache and clears the
/// pending-sync marker. Serving from the cache sets it, so the next caller can
/// tell the data may be stale.
#[derive(Clone)]
pub struct CollectionLoader {
    repository: RepositoryHandle,
    cache: LocalCache,
}
impl CollectionLoader {
    pub fn new(repository: RepositoryHandle, cache: LocalCache) -> Self {
        Self { repository, cache }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Load the collection.
    ///
    /// Makes exactly one remote attempt. There is no retry or backoff: a
    /// failed fetch goes straight to the cache.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::CollectionUnavailable`] if the remote fetch failed and the
    /// cache holds nothing usable. The remote error is kept as a child.
    #[instrument(skip(self), fields(repository = self.repository.name()))]
    pub async fn load(&self) -> Result<Vec<Book>> {
        match self.repository.get_all().await {
            Ok(raw) => {
                let books = normalize_books(raw);
                tracing::debug!(books = books.len(), "Normalized remote collection");
                self.cache.save_books(&books).await;
                self.cache.set_pending_sync(false).await;
                Ok(books)
            },
            Err(e) => {
                tracing::warn!(error = ?e, "Remote fetch failed, falling back to local cache");
                match self.cache.load_books().await {
                    Some(books) => {
                        tracing::info!(books = books.len(), "Serving collection from local cache");
                        self.cache.set_pending_sync(true).await;
                        Ok(books)
                    },
                    None => Err(e.raise(ErrorKind::CollectionUnavailable)),
                }
            },
        }
    }

    /// Re-load the collection every time `events` yields, typically once per
    /// focus of the screen showing it.
    ///
    /// Loads run one after another; an event arriving mid-load waits for the
    /// current one. The returned stream ends when `events` does.
    pub fn watch<'a, S>(&'a self, events: S) -> impl Stream<Item = Result<Vec<Book>>> + 'a
    where
        S: Stream<Item = ()> + 'a,
    {
        stream! {
            for await _focus in events {
                yield self.load().await;
            }
        }
    }
}
