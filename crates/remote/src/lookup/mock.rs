use crate::EditionLookup;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Edition lookup answering from a fixed table. Unknown titles count `0`.
#[derive(Default)]
pub struct MockLookup {
    counts: RwLock<HashMap<String, u64>>,
}
impl MockLookup {
    pub fn with_counts(counts: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        Self {
            counts: RwLock::new(counts.into_iter().map(|(title, count)| (title.into(), count)).collect()),
        }
    }

    pub async fn set_count(&self, title: impl Into<String>, count: u64) {
        self.counts.write().await.insert(title.into(), count);
    }
}

#[async_trait]
impl EditionLookup for MockLookup {
    async fn editions_count(&self, title: &str) -> u64 {
        self.counts.read().await.get(title.trim()).copied().unwrap_or(0)
    }
}
