//! Key-value persistence for cart records.
//!
//! The cart is stored as one JSON string under one key, the way a mobile
//! app's async key-value store holds it. Two backends are provided:
//!
//! - [`MemoryStorage`] - process-local map, for tests and scratch carts
//! - [`FileStorage`] - one file per key under a root directory

use std::future::Future;

use crate::error::StorageError;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Asynchronous string key-value storage.
pub trait KeyValueStorage: Send + Sync + 'static {
    /// Read the value stored under `key`, or `None` if there is none.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Check that `key` is usable as a record name.
///
/// Keys are limited to ASCII letters, digits, `_`, `-` and `.`, must not be
/// empty, and must not consist of dots only.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if key.is_empty() || key.chars().all(|c| c == '.') || !key.chars().all(allowed) {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}
