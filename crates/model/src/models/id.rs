use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Opaque book identifier, assigned by the remote repository.
///
/// Some backends hand out numeric ids and others strings; both are accepted
/// on the wire and kept as a string internally. An empty id means the record
/// never came back from the server (see [`BookId::is_assigned`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookId(String);
impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the remote repository has assigned this id.
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}
impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for BookId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl From<u64> for BookId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}
impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}
