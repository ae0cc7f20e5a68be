//! Remote CRUD over the book collection.

mod http;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::{DEFAULT_TIMEOUT, HttpRepository};
#[cfg(feature = "mock")]
pub use self::mock::MockRepository;
use crate::error::Result;
use async_trait::async_trait;
use shelf_model::{BookId, RemoteBook};

/// The authoritative owner of every book record.
///
/// Records cross this trait in their wire shape; callers run them through
/// [`from_remote`](shelf_model::from_remote) before use. There is no partial
/// update: [`update()`](Self::update) always sends the whole record.
///
/// # Examples
///
/// ```
/// use shelf_model::{BookId, normalize_books};
/// use shelf_remote::BookRepository;
///
/// async fn titles(repository: &dyn BookRepository) -> shelf_remote::error::Result<Vec<String>> {
///     let books = normalize_books(repository.get_all().await?);
///     Ok(books.into_iter().map(|book| book.nom).collect())
/// }
/// ```
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Name of this repository, used in logs.
    fn name(&self) -> &str;

    /// Every book the repository holds, in the order the repository returns
    /// them.
    async fn get_all(&self) -> Result<Vec<RemoteBook>>;

    async fn get_by_id(&self, id: &BookId) -> Result<RemoteBook>;

    /// Create a new record. The repository assigns the id and returns the
    /// stored record.
    async fn create(&self, book: &RemoteBook) -> Result<RemoteBook>;

    /// Replace the record with the given id, returning what was stored.
    async fn update(&self, id: &BookId, book: &RemoteBook) -> Result<RemoteBook>;

    async fn delete(&self, id: &BookId) -> Result<()>;
}
