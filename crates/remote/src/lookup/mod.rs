//! Bibliographic lookups against a third-party catalogue.

#[cfg(feature = "mock")]
mod mock;
mod openlibrary;

#[cfg(feature = "mock")]
pub use self::mock::MockLookup;
pub use self::openlibrary::{DEFAULT_TIMEOUT, OpenLibrary, SearchDoc, SearchResult};
use async_trait::async_trait;

/// Looks up how many editions a catalogue knows for a title.
///
/// Purely informational: implementations never fail. Anything that goes
/// wrong (blank title, network, bad payload) is logged and reported as `0`.
#[async_trait]
pub trait EditionLookup: Send + Sync {
    async fn editions_count(&self, title: &str) -> u64;
}
