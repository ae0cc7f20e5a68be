//! Local filesystem key-value store.
//!
//! Each key is stored as its own file inside a configured directory, using
//! `tokio::fs` for async I/O. Key-to-file-name encoding is handled by
//! [`file_name`](crate::key::file_name).

use crate::error::{ErrorKind, Result};
use crate::key::{file_name, validate as validate_key};
use crate::KeyValueStore;
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Appended to a value's file name while it is being written. `~` is always
/// percent-encoded by [`file_name`], so no key ever maps onto a temp file.
const TEMP_SUFFIX: &str = "~tmp";

/// Local filesystem key-value store.
///
/// Writes go to a temporary sibling file first and are then renamed into
/// place, so a reader never observes a half-written value.
///
/// # Examples
///
/// ```no_run
/// use shelf_storage::backend::LocalStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalStore::new("local", "/home/me/.local/share/shelf")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalStore {
    name: String,
    root: PathBuf,
}
impl LocalStore {
    /// Create a new local filesystem store.
    ///
    /// # Arguments
    /// * `root` - Absolute path to the directory holding the values
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists and is not a
    /// directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::Unavailable(format!("{} is not a directory", root.display())));
            }
        } else {
            // Use non-async here; it'll only happen once on start-up and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    /// Absolute file path for a key.
    fn file_path(&self, key: &str) -> Result<PathBuf> {
        let key = validate_key(key)?;
        Ok(self.root.join(file_name(key)))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.display().to_string()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_path(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => exn::bail!(Self::map_io_error(e, &path)),
        };
        Ok(Some(String::from_utf8(bytes).map_err(|_| ErrorKind::Encoding(key.to_string()))?))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key)?;
        let mut temp = path.clone().into_os_string();
        temp.push(TEMP_SUFFIX);
        let temp = PathBuf::from(temp);
        fs::write(&temp, value).await.map_err(|e| Self::map_io_error(e, &temp))?;
        fs::rename(&temp, &path).await.map_err(|e| Self::map_io_error(e, &path))?;
        tracing::trace!(store = %self.name, key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            let path = self.file_path(key)?;
            match fs::remove_file(&path).await {
                Ok(()) => {},
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => exn::bail!(Self::map_io_error(e, &path)),
            }
        }
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        let path = self.file_path(key)?;
        Ok(fs::try_exists(&path).await.map_err(ErrorKind::Io)?)
    }
}
