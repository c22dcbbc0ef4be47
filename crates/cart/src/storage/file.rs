//! File-backed storage backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::{KeyValueStorage, validate_key};

/// Key-value storage with one JSON file per key.
///
/// `set_item("cartItems", ..)` writes `<root>/cartItems.json`. Writes go to a
/// temporary sibling first and are renamed into place, so a crash mid-write
/// leaves the previous record intact. The root directory is created on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `key` is not a valid record name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{key}.json.tmp"));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(key))?;
        tokio::fs::write(&tmp, value).await.map_err(io_error(key))?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_error(key))?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Record written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}
