//! Cart error types.

use metalworks_core::{ProductId, QuantityError};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while operating on a cart.
///
/// None of these are fatal. A rejected mutation leaves the cart untouched,
/// and a failed write leaves the in-memory cart authoritative.
#[derive(Debug, Error)]
pub enum CartError {
    /// A mutation was called with a bad quantity or product.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing the persisted cart failed.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StorageError),

    /// The persisted cart could not be decoded.
    #[error("malformed persisted cart: {0}")]
    MalformedPersistedState(String),

    /// Checkout was requested for a cart with no items.
    #[error("cart is empty")]
    EmptyCart,
}

impl CartError {
    pub(crate) fn invalid_quantity(err: &QuantityError) -> Self {
        Self::InvalidArgument(err.to_string())
    }

    pub(crate) fn quantity_overflow(product_id: &ProductId) -> Self {
        Self::InvalidArgument(format!(
            "quantity for product {product_id} would exceed the maximum"
        ))
    }

    /// Whether the error was caused by caller input.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
