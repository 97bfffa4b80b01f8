//! Checkout hand-off.
//!
//! The cart does not know about payments. It emits a [`NavigationIntent`]
//! when the visitor heads to checkout, the checkout flow reads a
//! [`CheckoutSummary`], and once the payment gateway confirms, the flow calls
//! [`complete_checkout`] which clears the cart.

use metalworks_core::{CurrencyCode, Price};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartStore;

/// Path of the checkout page.
pub const CHECKOUT_PATH: &str = "/checkout";

/// What started the trip to checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSource {
    /// Checkout with the full cart.
    Cart,
    /// Checkout with a single product, replacing the cart.
    BuyNow,
}

/// A request for the router to move somewhere. The cart never waits for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationIntent {
    Checkout { source: CheckoutSource },
}

impl NavigationIntent {
    /// Path the router should navigate to.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Checkout { .. } => CHECKOUT_PATH,
        }
    }
}

/// One priced line of a checkout summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLine {
    pub product_id: String,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    /// `None` when the stored product has no usable price.
    pub unit_price: Option<String>,
    /// `None` when the line cannot be priced or its total overflows; such
    /// lines are left out of `total`.
    pub line_price: Option<String>,
}

/// What the checkout flow needs to take payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub lines: Vec<CheckoutLine>,
    pub total: Price,
    pub total_display: String,
    pub count: u64,
}

impl CheckoutSummary {
    /// Price every line of `cart` in `currency`.
    #[must_use]
    pub fn from_store(cart: &CartStore, currency: CurrencyCode) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|line| CheckoutLine {
                product_id: line.product.id.to_string(),
                title: line.product.title.clone(),
                image: line.product.image.clone(),
                quantity: line.quantity.get(),
                unit_price: line
                    .product
                    .price
                    .map(|amount| Price::new(amount, currency).display()),
                line_price: line
                    .line_total()
                    .map(|amount| Price::new(amount, currency).display()),
            })
            .collect();
        let total = Price::new(cart.cart_total(), currency);

        Self {
            lines,
            total,
            total_display: total.display(),
            count: cart.cart_count(),
        }
    }

    /// Whether there is anything to pay for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Proof from the payment gateway that a payment went through.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentConfirmation {
    /// Gateway reference for the captured payment.
    pub payment_reference: String,
}

/// Errors completing a checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The confirmation carried no payment reference.
    #[error("payment reference is missing")]
    MissingPaymentReference,
    /// Nothing to complete.
    #[error("cart is empty")]
    EmptyCart,
}

/// Clear the cart after a confirmed payment.
///
/// Returns the summary of what was paid for.
///
/// # Errors
///
/// Returns an error, leaving the cart untouched, if the confirmation has no
/// reference or the cart is already empty (e.g. a repeated confirmation).
pub fn complete_checkout(
    cart: &mut CartStore,
    currency: CurrencyCode,
    confirmation: &PaymentConfirmation,
) -> Result<CheckoutSummary, CheckoutError> {
    if confirmation.payment_reference.trim().is_empty() {
        return Err(CheckoutError::MissingPaymentReference);
    }
    if cart.is_empty() {
        tracing::warn!(
            key = cart.key(),
            payment_reference = %confirmation.payment_reference,
            "Payment confirmed for empty cart"
        );
        return Err(CheckoutError::EmptyCart);
    }

    let summary = CheckoutSummary::from_store(cart, currency);
    cart.clear_cart();
    tracing::info!(
        key = cart.key(),
        payment_reference = %confirmation.payment_reference,
        total = %summary.total_display,
        "Checkout completed"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use metalworks_core::{Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{MemoryStorage, keys};

    fn cart_with_items() -> CartStore {
        let mut cart = CartStore::load(Arc::new(MemoryStorage::new()), keys::CART);
        cart.add_to_cart(
            Product::new(
                ProductId::parse("a").unwrap(),
                "Fire Pit",
                Decimal::from(100),
                "/images/firepit.jpg",
                "outdoor",
            ),
            2,
        )
        .unwrap();
        cart.add_one(Product::new(
            ProductId::parse("b").unwrap(),
            "Wall Sconce",
            Decimal::new(25_050, 2),
            "/images/sconce.jpg",
            "lighting",
        ))
        .unwrap();
        cart
    }

    fn confirmation(reference: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            payment_reference: reference.to_string(),
        }
    }

    #[test]
    fn test_summary_prices_lines() {
        let cart = cart_with_items();
        let summary = CheckoutSummary::from_store(&cart, CurrencyCode::USD);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_display, "$450.50");
        assert_eq!(summary.lines[0].unit_price.as_deref(), Some("$100.00"));
        assert_eq!(summary.lines[0].line_price.as_deref(), Some("$200.00"));
        assert_eq!(summary.lines[1].title, "Wall Sconce");
    }

    #[test]
    fn test_complete_checkout_clears_once() {
        let mut cart = cart_with_items();

        let summary = complete_checkout(&mut cart, CurrencyCode::USD, &confirmation("pi_123")).unwrap();
        assert_eq!(summary.count, 3);
        assert!(cart.is_empty());

        assert_eq!(
            complete_checkout(&mut cart, CurrencyCode::USD, &confirmation("pi_123")),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_complete_checkout_requires_reference() {
        let mut cart = cart_with_items();
        assert_eq!(
            complete_checkout(&mut cart, CurrencyCode::USD, &confirmation("  ")),
            Err(CheckoutError::MissingPaymentReference)
        );
        assert_eq!(cart.cart_count(), 3);
    }

    #[test]
    fn test_navigation_intent_serializes_with_tag() {
        let intent = NavigationIntent::Checkout {
            source: CheckoutSource::BuyNow,
        };
        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            serde_json::json!({ "type": "checkout", "source": "buy_now" })
        );
        assert_eq!(intent.path(), CHECKOUT_PATH);
    }
}
