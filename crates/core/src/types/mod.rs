//! Core types for Metalworks.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartLineItem, Quantity, QuantityError};
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::Product;
