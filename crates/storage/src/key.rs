//! Key validation and encoding.
//!
//! Keys are free-form strings such as `@booklist_app:books`. Stores that map
//! keys onto something stricter (file names) go through [`file_name`].

use crate::error::{ErrorKind, Result};

/// Validates a store key.
///
/// Keys must be non-empty and free of control characters (null bytes
/// included). Everything else is allowed; stores are responsible for
/// encoding keys into whatever their medium accepts.
///
/// # Examples
///
/// ```
/// use shelf_storage::validate_key;
/// assert!(validate_key("@booklist_app:books").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("a\0b").is_err());
/// ```
pub fn validate(key: &str) -> Result<&str> {
    if key.is_empty() || key.chars().any(char::is_control) {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    Ok(key)
}

/// Encodes a (validated) key into a portable file name.
///
/// ASCII alphanumerics, `-`, `_` and `.` pass through; every other byte is
/// percent-encoded. A leading `.` is encoded too so that keys can never turn
/// into `.`, `..` or hidden files.
pub(crate) fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        match byte {
            b'.' if i == 0 => name.push_str("%2E"),
            b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.') => name.push(char::from(b)),
            b => name.push_str(&format!("%{b:02X}")),
        }
    }
    name
}
