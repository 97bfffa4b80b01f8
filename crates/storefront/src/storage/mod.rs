//! Durable key-value storage for persisted carts.
//!
//! A cart is stored as a single JSON string under a namespaced key. The
//! store reads its key once when it is created and overwrites it after
//! every mutation (last write wins); an emptied cart removes its key.
//! Nothing else writes cart keys.
//!
//! # Backends
//!
//! - [`FileStorage`] - one file per key under a data directory
//! - [`MemoryStorage`] - process-local map, used by tests and ephemeral runs

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use metalworks_core::VisitorId;
use thiserror::Error;

/// Storage keys for cart data.
pub mod keys {
    /// Namespace shared by every cart key.
    pub const CART_NAMESPACE: &str = "metalworks:cart";

    /// Key for the single-profile cart (CLI, local tooling).
    pub const CART: &str = CART_NAMESPACE;
}

/// Key under which a visitor's cart is persisted.
#[must_use]
pub fn visitor_cart_key(visitor: &VisitorId) -> String {
    format!("{}:{visitor}", keys::CART_NAMESPACE)
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The cart could not be serialized.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable key-value store holding serialized carts.
///
/// Implementations must be safe to share between threads; the HTTP service
/// hands one instance to every visitor's cart.
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_cart_key_is_namespaced() {
        let visitor = VisitorId::parse("abc-123").unwrap();
        assert_eq!(visitor_cart_key(&visitor), "metalworks:cart:abc-123");
        assert_ne!(visitor_cart_key(&visitor), keys::CART);
    }
}
