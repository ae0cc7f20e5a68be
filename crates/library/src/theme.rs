//! Persisted light/dark display preference.

use derive_more::Display;
use shelf_storage::StoreHandle;

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    #[display("light")]
    Light,
    #[display("dark")]
    Dark,
}
impl ThemeMode {
    /// Parse a stored value. Anything unrecognised is `None`.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// The user's theme choice, backed by the key-value store under
/// `{namespace}:theme`.
///
/// Passed explicitly to whatever renders; there is no global theme. Storage
/// failures never surface: a preference that can't be read is
/// [`ThemeMode::Light`], and one that can't be written is only logged.
pub struct ThemePreference {
    store: StoreHandle,
    key: String,
    mode: ThemeMode,
}
impl ThemePreference {
    pub fn key(namespace: &str) -> String {
        format!("{namespace}:theme")
    }

    /// Read the stored preference.
    pub async fn load(store: StoreHandle, namespace: impl AsRef<str>) -> Self {
        let key = Self::key(namespace.as_ref());
        let mode = match store.get(&key).await {
            Ok(Some(value)) => ThemeMode::from_stored(&value).unwrap_or_else(|| {
                tracing::warn!(key = %key, value = %value, "Ignoring unknown theme preference");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = ?e, "Error loading theme preference");
                ThemeMode::default()
            },
        };
        Self { store, key, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    /// Flip between light and dark, persist, and return the new mode.
    pub async fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled()).await;
        self.mode
    }

    pub async fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.persist().await;
    }

    /// Write the current mode to the store.
    pub async fn persist(&self) {
        let value = self.mode.to_string();
        match self.store.set(&self.key, &value).await {
            Ok(()) => tracing::debug!(key = %self.key, mode = %value, "Theme preference saved"),
            Err(e) => tracing::error!(key = %self.key, error = ?e, "Error saving theme preference"),
        }
    }
}
