//! Application state shared across handlers.

use std::sync::Arc;

use metalworks_core::CurrencyCode;

use crate::catalog::Catalog;
use crate::carts::CartRegistry;
use crate::config::StorefrontConfig;
use crate::storage::CartStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the per-visitor carts and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Loaded product catalog
    /// * `storage` - Where carts are persisted
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: Arc<dyn CartStorage>) -> Self {
        let carts = CartRegistry::new(storage, config.cart_idle_timeout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the per-visitor cart registry.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry {
        &self.inner.carts
    }

    /// Currency prices are shown and charged in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.catalog.currency()
    }
}
