//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StorageError;

use super::KeyValueStorage;

/// Process-local key-value storage.
///
/// Clones share the same map, so a test can keep one handle while the store
/// owns another. Reads and writes can be switched to fail to exercise the
/// store's error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one record.
    #[must_use]
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.items.insert(key.into(), value.into());
        }
        storage
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_reads = fail;
        }
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Read a record without going through the async interface.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.items.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(StorageError::Unavailable(format!("read of {key} refused")));
        }
        Ok(inner.items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        inner.items.insert(key.to_owned(), value.to_owned());
        inner.writes += 1;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(StorageError::Unavailable(format!("remove of {key} refused")));
        }
        inner.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").await.unwrap(), None);

        storage.set_item("k", "v").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(storage.write_count(), 1);

        storage.remove_item("k").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").await.unwrap();
        assert_eq!(other.peek("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let storage = MemoryStorage::with_item("k", "old");
        storage.set_fail_writes(true);
        assert!(matches!(
            storage.set_item("k", "new").await,
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(storage.peek("k").as_deref(), Some("old"));
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let storage = MemoryStorage::with_item("k", "v");
        storage.set_fail_reads(true);
        assert!(matches!(
            storage.get_item("k").await,
            Err(StorageError::Unavailable(_))
        ));

        storage.set_fail_reads(false);
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v"));
    }
}
