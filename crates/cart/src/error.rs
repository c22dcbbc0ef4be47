//! Error types for the cart store and its configuration.
//!
//! Storage errors never reach callers of cart commands: the store logs them
//! and retries on the next write. They surface only through
//! [`CartStore::flush`](crate::store::CartStore::flush) and the storage
//! backends themselves.

use thiserror::Error;

/// Errors raised by a [`KeyValueStorage`](crate::storage::KeyValueStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used as a storage record name.
    #[error("invalid storage key {0:?}: use letters, digits, '_', '-' or '.'")]
    InvalidKey(String),

    /// The cart could not be encoded.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}
