//! Metalworks Core - Shared types library.
//!
//! This crate provides common types used across all Metalworks components:
//! - `storefront` - Cart service and JSON API for the shop
//! - `cli` - Command-line tools for browsing the catalog and driving a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, products and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
