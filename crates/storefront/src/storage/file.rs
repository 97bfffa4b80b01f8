//! File-backed cart storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{CartStorage, StorageError};

/// Stores each key as `<data_dir>/<sanitized-key>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write never leaves a truncated cart behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "Opened file storage");
        Ok(Self { root })
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }
}

/// Map a key to a file stem; anything outside `[A-Za-z0-9_-]` becomes `_`.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_sanitizes_key() {
        assert_eq!(file_stem("metalworks:cart"), "metalworks_cart");
        assert_eq!(file_stem("a/../b"), "a____b");
        assert_eq!(file_stem("cart-1_x"), "cart-1_x");
    }

    #[test]
    fn test_read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.read("metalworks:cart").unwrap(), None);
    }

    #[test]
    fn test_write_then_read_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("carts")).unwrap();

        storage.write("metalworks:cart", "[1]").unwrap();
        storage.write("metalworks:cart", "[2]").unwrap();

        assert_eq!(
            storage.read("metalworks:cart").unwrap().as_deref(),
            Some("[2]")
        );
        assert!(storage.root().join("metalworks_cart.json").exists());
        assert!(!storage.root().join("metalworks_cart.json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.write("k", "[]").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
    }
}
