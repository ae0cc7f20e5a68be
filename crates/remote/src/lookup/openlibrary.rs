use crate::EditionLookup;
use crate::error::{ErrorKind, Result, transport};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One catalogue entry from a title search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchDoc {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub edition_count: Option<u64>,
}

/// Result of a title search: how many entries matched, and the first few.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// Client for the Open Library search API.
///
/// Only the first matching entry is ever requested (`limit=1`); the
/// interesting number is `numFound`, which the edition lookup reports as-is.
#[derive(Clone, Debug)]
pub struct OpenLibrary {
    search: Url,
    client: Client,
}
impl OpenLibrary {
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfig`] if `base_url` is not an absolute
    /// `http(s)://` URL, or if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut search =
            Url::parse(base_url).or_raise(|| ErrorKind::InvalidConfig(format!("invalid base URL {base_url:?}")))?;
        if !matches!(search.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidConfig(format!("base URL must be http(s): {base_url:?}")));
        }
        search
            .path_segments_mut()
            .map_err(|()| ErrorKind::InvalidConfig(format!("base URL must be http(s): {base_url:?}")))?
            .pop_if_empty()
            .push("search.json");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::InvalidConfig("could not build HTTP client".to_string()))?;
        Ok(Self { search, client })
    }

    /// Search the catalogue by title.
    #[instrument(skip(self))]
    pub async fn search(&self, title: &str) -> Result<SearchResult> {
        let response = self
            .client
            .get(self.search.clone())
            .query(&[("title", title), ("limit", "1")])
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        response.json().await.map_err(transport)
    }
}

#[async_trait]
impl EditionLookup for OpenLibrary {
    async fn editions_count(&self, title: &str) -> u64 {
        let title = title.trim();
        if title.is_empty() {
            return 0;
        }
        match self.search(title).await {
            Ok(result) => result.num_found,
            Err(e) => {
                tracing::warn!(title, error = ?e, "Error looking up editions count");
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::respond_once;
    use rstest::rstest;

    fn lookup(base: &str) -> OpenLibrary {
        OpenLibrary::new(base, Duration::from_secs(5)).unwrap()
    }

    #[rstest]
    #[case("https://openlibrary.org", "https://openlibrary.org/search.json")]
    #[case("https://openlibrary.org/", "https://openlibrary.org/search.json")]
    #[case("http://mirror.local/ol", "http://mirror.local/ol/search.json")]
    fn test_search_url(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(lookup(base).search.as_str(), expected);
    }

    #[tokio::test]
    async fn test_editions_count() {
        let (base, server) = respond_once(
            "200 OK",
            r#"{"numFound":42,"start":0,"docs":[{"title":"Dune","author_name":["Frank Herbert"],"first_publish_year":1965}]}"#,
        )
        .await;
        assert_eq!(lookup(&base).editions_count("  Dune Messiah ").await, 42);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /search.json?title=Dune+Messiah&limit=1 HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_search_docs() {
        let (base, _server) = respond_once(
            "200 OK",
            r#"{"numFound":1,"docs":[{"title":"Dune","author_name":["Frank Herbert"],"edition_count":120}]}"#,
        )
        .await;
        let result = lookup(&base).search("Dune").await.unwrap();
        assert_eq!(result.docs[0].title.as_deref(), Some("Dune"));
        assert_eq!(result.docs[0].author_name, vec!["Frank Herbert".to_string()]);
        assert_eq!(result.docs[0].edition_count, Some(120));
        assert_eq!(result.docs[0].first_publish_year, None);
    }

    #[rstest]
    #[case("200 OK", "{}")]
    #[case("200 OK", "<html>")]
    #[case("503 Service Unavailable", r#"{"numFound":9}"#)]
    #[tokio::test]
    async fn test_failures_count_zero(#[case] status: &'static str, #[case] body: &'static str) {
        let (base, _server) = respond_once(status, body).await;
        assert_eq!(lookup(&base).editions_count("Dune").await, 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn test_blank_title_skips_request(#[case] title: &str) {
        // Nothing listens here; a request would fail, but none is made.
        assert_eq!(lookup("http://127.0.0.1:9").editions_count(title).await, 0);
    }

    #[tokio::test]
    async fn test_unreachable_counts_zero() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert_eq!(lookup(&format!("http://{addr}")).editions_count("Dune").await, 0);
    }
}
