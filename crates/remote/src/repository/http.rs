//! JSON-over-HTTP book repository.
//!
//! | Operation                          | Request               |
//! |------------------------------------|-----------------------|
//! | [`get_all`](BookRepository::get_all)     | `GET /books`          |
//! | [`get_by_id`](BookRepository::get_by_id) | `GET /books/{id}`     |
//! | [`create`](BookRepository::create)       | `POST /books`         |
//! | [`update`](BookRepository::update)       | `PUT /books/{id}`     |
//! | [`delete`](BookRepository::delete)       | `DELETE /books/{id}`  |

use crate::BookRepository;
use crate::error::{ErrorKind, Result, transport};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Response, StatusCode, Url};
use shelf_model::{BookId, RemoteBook};
use std::time::Duration;
use tracing::instrument;

/// Transport-level timeout applied to every request unless configured
/// otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct HttpRepository {
    name: String,
    base: Url,
    client: Client,
}
impl HttpRepository {
    /// Create a repository client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfig`] if `base_url` is not an absolute
    /// `http(s)://` URL, or if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).or_raise(|| ErrorKind::InvalidConfig(format!("invalid base URL {base_url:?}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidConfig(format!("base URL must be http(s): {base_url:?}")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::InvalidConfig("could not build HTTP client".to_string()))?;
        Ok(Self {
            name: base.host_str().unwrap_or("http").to_string(),
            base,
            client,
        })
    }

    /// Change the name used for this repository in logs (defaults to the
    /// host name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// `{base}/books`, or `{base}/books/{id}` with the id as a single
    /// percent-encoded path segment.
    fn endpoint(&self, id: Option<&BookId>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ErrorKind::InvalidConfig(self.base.to_string()))?;
            segments.pop_if_empty().push("books");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn check(&self, response: Response, id: Option<&BookId>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        tracing::warn!(repository = %self.name, url = %response.url(), status = status.as_u16(), "Unexpected HTTP status");
        match id {
            Some(id) if status == StatusCode::NOT_FOUND => exn::bail!(ErrorKind::NotFound(id.clone())),
            _ => exn::bail!(ErrorKind::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl BookRepository for HttpRepository {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(repository = %self.name))]
    async fn get_all(&self) -> Result<Vec<RemoteBook>> {
        let response = self.client.get(self.endpoint(None)?).send().await.map_err(transport)?;
        let books: Vec<RemoteBook> = self.check(response, None)?.json().await.map_err(transport)?;
        tracing::debug!(books = books.len(), "Fetched collection");
        Ok(books)
    }

    #[instrument(skip(self), fields(repository = %self.name, id = %id))]
    async fn get_by_id(&self, id: &BookId) -> Result<RemoteBook> {
        let response = self.client.get(self.endpoint(Some(id))?).send().await.map_err(transport)?;
        self.check(response, Some(id))?.json().await.map_err(transport)
    }

    #[instrument(skip(self, book), fields(repository = %self.name))]
    async fn create(&self, book: &RemoteBook) -> Result<RemoteBook> {
        let response = self.client.post(self.endpoint(None)?).json(book).send().await.map_err(transport)?;
        let created: RemoteBook = self.check(response, None)?.json().await.map_err(transport)?;
        tracing::debug!(id = ?created.id, "Created book");
        Ok(created)
    }

    #[instrument(skip(self, book), fields(repository = %self.name, id = %id))]
    async fn update(&self, id: &BookId, book: &RemoteBook) -> Result<RemoteBook> {
        let response = self.client.put(self.endpoint(Some(id))?).json(book).send().await.map_err(transport)?;
        self.check(response, Some(id))?.json().await.map_err(transport)
    }

    #[instrument(skip(self), fields(repository = %self.name, id = %id))]
    async fn delete(&self, id: &BookId) -> Result<()> {
        let response = self.client.delete(self.endpoint(Some(id))?).send().await.map_err(transport)?;
        self.check(response, Some(id))?;
        Ok(())
    }
}
