//! In-memory book repository for testing.

use crate::BookRepository;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::OptionExt;
use shelf_model::{BookId, RemoteBook};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory book repository for testing.
///
/// Records keep their insertion order. New records get sequential numeric ids
/// continuing after the highest numeric id already present. The repository
/// can be taken [offline](Self::set_offline) to simulate a network failure,
/// and every call (successful or not) is [counted](Self::calls) so tests can
/// assert that nothing reached the network.
///
/// # Examples
///
/// ```
/// use shelf_model::{BookId, RemoteBook};
/// use shelf_remote::BookRepository;
/// use shelf_remote::repository::MockRepository;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = MockRepository::default();
/// let created = repository.create(&RemoteBook { name: Some("Dune".to_string()), ..Default::default() }).await?;
/// assert_eq!(created.id, Some(BookId::from("1")));
///
/// repository.set_offline(true);
/// assert!(repository.get_all().await.is_err());
/// assert_eq!(repository.calls(), 2);
/// # Ok(())
/// # }
/// ```
pub struct MockRepository {
    books: RwLock<Vec<RemoteBook>>,
    next_id: AtomicU64,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MockRepository {
    /// Create a mock repository pre-populated with records.
    ///
    /// Panics if any record has no id. If test setup is wrong, then test
    /// should not pass.
    pub fn with_books(books: impl IntoIterator<Item = RemoteBook>) -> Self {
        let books: Vec<RemoteBook> = books.into_iter().collect();
        let mut highest = 0;
        for book in &books {
            let Some(id) = &book.id else {
                // The panic here is DELIBERATE. MockRepository is intended to
                // be used in tests; panics are expected.
                panic!("MockRepository::with_books: record without id {book:?}");
            };
            highest = highest.max(id.as_str().parse::<u64>().unwrap_or(0));
        }
        Self {
            books: RwLock::new(books),
            next_id: AtomicU64::new(highest + 1),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent call fail with [`ErrorKind::Network`] (or
    /// succeed again, when `false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of trait calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored records.
    pub async fn books(&self) -> Vec<RemoteBook> {
        self.books.read().await.clone()
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Network("mock repository is offline".to_string()));
        }
        Ok(())
    }
}
impl Default for MockRepository {
    fn default() -> Self {
        Self::with_books(Vec::new())
    }
}

#[async_trait]
impl BookRepository for MockRepository {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_all(&self) -> Result<Vec<RemoteBook>> {
        self.begin()?;
        Ok(self.books.read().await.clone())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<RemoteBook> {
        self.begin()?;
        let guard = self.books.read().await;
        let book = guard.iter().find(|book| book.id.as_ref() == Some(id));
        book.cloned().ok_or_raise(|| ErrorKind::NotFound(id.clone()))
    }

    async fn create(&self, book: &RemoteBook) -> Result<RemoteBook> {
        self.begin()?;
        let mut stored = book.clone();
        stored.id = Some(BookId::from(self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.books.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &BookId, book: &RemoteBook) -> Result<RemoteBook> {
        self.begin()?;
        let mut guard = self.books.write().await;
        let Some(slot) = guard.iter_mut().find(|book| book.id.as_ref() == Some(id)) else {
            exn::bail!(ErrorKind::NotFound(id.clone()));
        };
        *slot = RemoteBook {
            id: Some(id.clone()),
            ..book.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: &BookId) -> Result<()> {
        self.begin()?;
        let mut guard = self.books.write().await;
        let before = guard.len();
        guard.retain(|book| book.id.as_ref() != Some(id));
        if guard.len() == before {
            exn::bail!(ErrorKind::NotFound(id.clone()));
        }
        Ok(())
    }
}
