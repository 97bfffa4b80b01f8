//! Shopping cart state.
//!
//! # Architecture
//!
//! - [`CartAction`] values describe every mutation
//! - [`action::reduce`] computes the next contents without side effects
//! - [`CartStore`] owns the contents, persists after each applied mutation
//!   and publishes [`CartSnapshot`]s to subscribers
//! - [`codec`] reads and writes the persisted JSON format
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use metalworks_core::{Product, ProductId};
//! use metalworks_storefront::cart::CartStore;
//! use metalworks_storefront::storage::{MemoryStorage, keys};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::load(Arc::new(MemoryStorage::new()), keys::CART);
//! let gate = Product::new(
//!     ProductId::parse("gate-1").unwrap(),
//!     "Scroll Gate",
//!     Decimal::from(1450),
//!     "/images/gates/scroll.jpg",
//!     "gates",
//! );
//!
//! cart.add_to_cart(gate.clone(), 2).unwrap();
//! cart.add_one(gate).unwrap();
//! assert_eq!(cart.cart_count(), 3);
//! assert_eq!(cart.cart_total(), Decimal::from(4350));
//! ```

pub mod action;
pub mod codec;
mod error;
mod store;

pub use action::{CartAction, Transition};
pub use error::CartError;
pub use store::{CartSnapshot, CartStore};
