use time::OffsetDateTime;

/// A free-text note attached to a single [`Book`](super::Book).
///
/// Notes are append-only and kept in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub content: String,
    pub created_at: OffsetDateTime,
}
impl Note {
    pub fn new(content: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            content: content.into(),
            created_at,
        }
    }
}
