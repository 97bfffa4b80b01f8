//! Cart line items and quantities.

use core::fmt;
use core::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuantityError {
    /// Zero or negative quantity.
    #[error("quantity must be positive (got {0})")]
    NotPositive(i64),
    /// Quantity does not fit in a `u32`.
    #[error("quantity must be at most {max} (got {value})")]
    TooLarge {
        /// Rejected value.
        value: i64,
        /// Largest accepted quantity.
        max: u32,
    },
    /// Value is not a whole number (fractional, NaN or infinite).
    #[error("quantity must be a whole number (got {0})")]
    NotInteger(f64),
}

/// A positive number of units of one product.
///
/// ## Examples
///
/// ```
/// use metalworks_core::Quantity;
///
/// assert_eq!(Quantity::new(3).unwrap().get(), 3);
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Build a quantity from a signed count.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is zero, negative or larger than `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(QuantityError::TooLarge {
                value,
                max: u32::MAX,
            })
    }

    /// Number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.get()).map(Self)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    #[allow(clippy::cast_possible_truncation)] // Checked to be integral and in range first
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(QuantityError::NotInteger(value));
        }
        if value > f64::from(u32::MAX) {
            return Err(QuantityError::TooLarge {
                value: i64::MAX,
                max: u32::MAX,
            });
        }
        Self::new(value as i64)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: Quantity,
}

impl CartLineItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(product: Product, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    /// The product id this line is keyed by.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// `price * quantity`, or `None` if the product has no price or the
    /// multiplication overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .price?
            .checked_mul(Decimal::from(self.quantity.get()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: Decimal) -> Product {
        Product::new(
            ProductId::parse("planter-1").unwrap(),
            "Corten Planter",
            price,
            "/images/planter.jpg",
            "garden",
        )
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::new(1).unwrap(), Quantity::ONE);
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert!(matches!(
            Quantity::new(i64::from(u32::MAX) + 1),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_quantity_from_json_number() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        let q: Quantity = serde_json::from_str("2.0").unwrap();
        assert_eq!(q.get(), 2);

        assert!(serde_json::from_str::<Quantity>("2.5").is_err());
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert!(serde_json::from_str::<Quantity>("\"3\"").is_err());
        assert_eq!(serde_json::to_string(&q).unwrap(), "2");
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Quantity::new(i64::from(u32::MAX)).unwrap();
        assert!(max.checked_add(Quantity::ONE).is_none());
        assert_eq!(
            Quantity::new(2).unwrap().checked_add(Quantity::new(3).unwrap()),
            Some(Quantity::new(5).unwrap())
        );
    }

    #[test]
    fn test_line_total() {
        let line = CartLineItem::new(product(Decimal::new(1250, 2)), Quantity::new(3).unwrap());
        assert_eq!(line.line_total(), Some(Decimal::new(3750, 2)));

        let line = CartLineItem::new(product(Decimal::MAX), Quantity::new(2).unwrap());
        assert_eq!(line.line_total(), None);

        let mut unpriced = product(Decimal::ONE);
        unpriced.price = None;
        let line = CartLineItem::new(unpriced, Quantity::new(2).unwrap());
        assert_eq!(line.line_total(), None);
    }
}
