//! In-memory cart storage.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{CartStorage, StorageError};

/// A process-local map of keys to values.
///
/// Values are lost when the process exits. Reads and writes can be switched
/// off with [`MemoryStorage::fail_reads`] and [`MemoryStorage::fail_writes`]
/// to exercise the degraded persistence paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one key.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.write() {
            entries.insert(key.into(), value.into());
        }
        storage
    }

    /// Make every subsequent `read` fail (or succeed again with `false`).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `write` and `remove` fail (or succeed again
    /// with `false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "writes disabled for key {key}"
            )));
        }
        Ok(())
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "reads disabled for key {key}"
            )));
        }
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
