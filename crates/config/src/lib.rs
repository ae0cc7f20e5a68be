//! Layered configuration for the shelf library.
//!
//! Values are resolved in order, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. An optional config file, format chosen by extension (`.toml`,
//!    `.yaml`/`.yml`, `.json`).
//! 3. Environment variables prefixed `SHELF_`, with `__` separating nested
//!    keys (`SHELF_API__BASE_URL`, `SHELF_STORAGE__NAMESPACE`, ...).

mod config;
pub mod error;

pub use crate::config::{ApiConfig, Config, ENV_PREFIX, LookupConfig, StorageConfig};
