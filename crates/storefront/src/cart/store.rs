//! The cart state container.

use std::fmt;
use std::sync::Arc;

use metalworks_core::{CartLineItem, Product, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{broadcast, watch};

use super::action::{self, CartAction, Transition};
use super::{CartError, codec};
use crate::checkout::{CheckoutSource, NavigationIntent};
use crate::storage::{CartStorage, StorageError};

/// Capacity of the navigation channel; slow listeners miss older intents.
const NAVIGATION_CAPACITY: usize = 16;

/// Point-in-time view of a cart, published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub is_cart_open: bool,
}

/// Single source of truth for one cart.
///
/// The store loads its contents once from [`CartStorage`] and overwrites the
/// stored value after every applied mutation; a mutation that leaves the
/// cart empty removes the key instead. A failed write is logged and
/// otherwise ignored: the in-memory contents stay authoritative until the
/// next successful write.
///
/// Mutations take `&mut self`; callers sharing a store across tasks wrap it
/// in a mutex so that two mutations never interleave.
pub struct CartStore {
    items: Vec<CartLineItem>,
    is_cart_open: bool,
    persisted: bool,
    storage: Arc<dyn CartStorage>,
    key: String,
    snapshots: watch::Sender<CartSnapshot>,
    navigation: broadcast::Sender<NavigationIntent>,
}

impl CartStore {
    /// Create a store from whatever is persisted under `key`.
    ///
    /// A missing key gives an empty cart. Unreadable storage or a corrupt
    /// value never fails: malformed entries are dropped and the valid ones
    /// are kept.
    pub fn load(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let key = key.into();

        let (items, persisted) = match storage.read(&key) {
            Ok(Some(raw)) => {
                let decoded = codec::decode(&raw);
                for problem in &decoded.problems {
                    tracing::warn!(key = %key, error = %problem, "Dropped malformed cart data");
                }
                (decoded.items, true)
            }
            Ok(None) => (Vec::new(), true),
            Err(e) => {
                let err = CartError::PersistenceUnavailable(e);
                tracing::error!(key = %key, error = %err, "Failed to read cart, starting empty");
                (Vec::new(), false)
            }
        };

        tracing::debug!(key = %key, lines = items.len(), "Cart loaded");

        let (snapshots, _) = watch::channel(CartSnapshot {
            items: items.clone(),
            is_cart_open: false,
        });
        let (navigation, _) = broadcast::channel(NAVIGATION_CAPACITY);

        Self {
            items,
            is_cart_open: false,
            persisted,
            storage,
            key,
            snapshots,
            navigation,
        }
    }

    // =========================================================================
    // State container
    // =========================================================================

    /// Apply an action: reduce, persist, notify.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if the action was rejected; the
    /// cart is unchanged and nothing is written or published.
    pub fn dispatch(&mut self, action: CartAction) -> Result<(), CartError> {
        match action::reduce(&self.items, &action) {
            Ok(transition) => {
                self.apply(action.name(), transition);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    action = action.name(),
                    error = %e,
                    "Cart mutation rejected"
                );
                Err(e)
            }
        }
    }

    fn apply(&mut self, action: &'static str, transition: Transition) {
        match transition {
            Transition::Changed(items) => {
                self.items = items;
                self.persist();
                self.publish();
                tracing::debug!(key = %self.key, action, lines = self.items.len(), "Cart updated");
            }
            Transition::Unchanged => {
                tracing::debug!(key = %self.key, action, "Cart mutation had no effect");
            }
        }
    }

    fn persist(&mut self) {
        let result = if self.items.is_empty() {
            self.storage.remove(&self.key)
        } else {
            codec::encode(&self.items)
                .map_err(StorageError::from)
                .and_then(|encoded| self.storage.write(&self.key, &encoded))
        };

        match result {
            Ok(()) => self.persisted = true,
            Err(e) => {
                self.persisted = false;
                let err = CartError::PersistenceUnavailable(e);
                tracing::error!(
                    key = %self.key,
                    error = %err,
                    "Failed to persist cart, keeping in-memory state"
                );
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    /// Current contents and visibility.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            is_cart_open: self.is_cart_open,
        }
    }

    /// Receive a snapshot after every applied mutation or visibility change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    /// Receive navigation intents emitted by buy-now and checkout.
    #[must_use]
    pub fn navigation(&self) -> broadcast::Receiver<NavigationIntent> {
        self.navigation.subscribe()
    }

    /// Storage key this cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the last read or write of the persisted cart succeeded.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`, growing its line if present.
    ///
    /// Calling this twice accumulates; it is not idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if `quantity <= 0` or the
    /// resulting quantity would overflow. The cart is left unchanged.
    pub fn add_to_cart(&mut self, product: Product, quantity: i64) -> Result<(), CartError> {
        self.dispatch(CartAction::Add { product, quantity })
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if the line is already at the
    /// maximum quantity.
    pub fn add_one(&mut self, product: Product) -> Result<(), CartError> {
        self.add_to_cart(product, 1)
    }

    /// Remove the line for `product_id`. Absent ids are a no-op.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        let action = CartAction::Remove {
            product_id: product_id.clone(),
        };
        let transition = action::reduce(&self.items, &action).unwrap_or(Transition::Unchanged);
        self.apply(action.name(), transition);
    }

    /// Set the quantity of `product_id` to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if `quantity` exceeds `u32::MAX`.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Empty the cart and drop its persisted value.
    pub fn clear_cart(&mut self) {
        self.apply(CartAction::Clear.name(), Transition::Changed(Vec::new()));
    }

    /// Replace the whole cart with `quantity` units of `product` and head to
    /// checkout.
    ///
    /// Any existing lines are discarded, not merged. The cart surface is
    /// closed and a [`NavigationIntent`] is broadcast and returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if `quantity <= 0`; the cart is
    /// untouched and nothing is emitted.
    pub fn buy_now(
        &mut self,
        product: Product,
        quantity: i64,
    ) -> Result<NavigationIntent, CartError> {
        self.dispatch(CartAction::Replace { product, quantity })?;
        self.set_cart_open(false);
        Ok(self.navigate(CheckoutSource::BuyNow))
    }

    /// Close the cart surface and head to checkout with the current lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if there is nothing to check out.
    pub fn begin_checkout(&mut self) -> Result<NavigationIntent, CartError> {
        if self.items.is_empty() {
            tracing::warn!(key = %self.key, "Checkout requested for empty cart");
            return Err(CartError::EmptyCart);
        }
        self.set_cart_open(false);
        Ok(self.navigate(CheckoutSource::Cart))
    }

    fn navigate(&self, source: CheckoutSource) -> NavigationIntent {
        let intent = NavigationIntent::Checkout { source };
        if self.navigation.send(intent.clone()).is_err() {
            tracing::debug!(key = %self.key, "No navigation listeners");
        }
        tracing::info!(key = %self.key, ?source, "Navigating to checkout");
        intent
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Whether the cart surface is shown.
    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.is_cart_open
    }

    /// Show or hide the cart surface. Not persisted.
    pub fn set_cart_open(&mut self, open: bool) {
        if self.is_cart_open != open {
            self.is_cart_open = open;
            self.publish();
        }
    }

    /// Show the cart surface.
    pub fn open_cart(&mut self) {
        self.set_cart_open(true);
    }

    /// Hide the cart surface.
    pub fn close_cart(&mut self) {
        self.set_cart_open(false);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Line items in the order products were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, or 0.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|line| &line.product.id == product_id)
            .map_or(0, |line| line.quantity.get())
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// Recomputed on every call. Lines without a usable price contribute
    /// nothing; a line whose contribution overflows is skipped rather than
    /// poisoning the total.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |total, line| {
            if line.product.price.is_none() {
                tracing::debug!(product_id = %line.product_id(), "Skipping unpriced line");
                return total;
            }
            match line.line_total().and_then(|amount| total.checked_add(amount)) {
                Some(sum) => sum,
                None => {
                    tracing::warn!(product_id = %line.product_id(), "Skipping line total that overflows");
                    total
                }
            }
        })
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items)
            .field("is_cart_open", &self.is_cart_open)
            .field("persisted", &self.persisted)
            .finish_non_exhaustive()
    }
}
