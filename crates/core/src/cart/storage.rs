//! Durable storage abstraction for the cart.
//!
//! The whole cart serializes to one string value under one key: read returns
//! the value or nothing, write replaces it, clear removes it. There are no
//! partial or append operations.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// A cart storage backend failed.
///
/// Callers treat this as "storage unavailable": the cart degrades to
/// in-memory state for the current operation.
#[derive(Debug, Error)]
#[error("cart storage unavailable: {0}")]
pub struct StorageError(String);

impl StorageError {
    /// Create a storage error with a diagnostic message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Single-key durable storage for the serialized cart collection.
pub trait CartStorage {
    /// Read the stored value, or `None` when no cart has been persisted.
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    async fn write(&self, value: &str) -> Result<(), StorageError>;

    /// Remove the stored value.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory [`CartStorage`] backend.
///
/// Used by tests and by embedders that do not need durability. Clones share
/// the same underlying value. `set_failing` makes every operation error,
/// for exercising the degraded path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    value: Option<String>,
    failing: bool,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-seeded with a raw value, as if a previous
    /// session had written it.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().value = Some(value.into());
        storage
    }

    /// Toggle failure injection: while set, every operation errors.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Inspect the raw stored value.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().value.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.lock().failing {
            return Err(StorageError::new("memory storage failure injected"));
        }
        Ok(())
    }
}

impl CartStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.lock().value.clone())
    }

    async fn write(&self, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.lock().value = Some(value.to_owned());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check_available()?;
        self.lock().value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read().await.expect("read"), None);

        storage.write("[]").await.expect("write");
        assert_eq!(storage.read().await.expect("read"), Some("[]".to_owned()));

        storage.clear().await.expect("clear");
        assert_eq!(storage.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn failure_injection_blocks_every_operation() {
        let storage = MemoryStorage::with_value("[]");
        storage.set_failing(true);

        assert!(storage.read().await.is_err());
        assert!(storage.write("[]").await.is_err());
        assert!(storage.clear().await.is_err());

        // The stored value is untouched by failed operations.
        storage.set_failing(false);
        assert_eq!(storage.read().await.expect("read"), Some("[]".to_owned()));
    }
}
