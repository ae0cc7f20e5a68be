use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use shelf_cache::DEFAULT_NAMESPACE;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SHELF_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub lookup: LookupConfig,
    pub storage: StorageConfig,
}

/// The remote book repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}
impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
        }
    }
}
impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The bibliographic lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}
impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            timeout_secs: 5,
        }
    }
}
impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The local key-value store backing the cache and preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the store. Falls back to the platform data directory
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub namespace: String,
}
impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
impl StorageConfig {
    /// The configured directory, or the platform data directory for `shelf`.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("", "", "shelf").ok_or_raise(|| ErrorKind::NoDataDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

impl Config {
    /// Build the layered provider without extracting it.
    ///
    /// # Errors
    ///
    /// Fails if `file` is given but doesn't exist, or has an unrecognised
    /// extension.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Resolve and validate the configuration.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(file)?.extract().or_raise(|| ErrorKind::Parse)?;
        config.validate()?;
        tracing::debug!(
            api = %config.api.base_url,
            lookup = %config.lookup.base_url,
            namespace = %config.storage.namespace,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_url("lookup.base_url", &self.lookup.base_url)?;
        if self.api.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("api.timeout_secs must be greater than zero".to_string()));
        }
        if self.lookup.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("lookup.timeout_secs must be greater than zero".to_string()));
        }
        if self.storage.namespace.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("storage.namespace must not be empty".to_string()));
        }
        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => exn::bail!(ErrorKind::Invalid(format!("{field} must be an http(s) URL, got {url:?}"))),
    }
}
