//! Per-visitor cart stores for the HTTP service.
//!
//! Every visitor gets their own [`CartStore`], persisted under
//! `metalworks:cart:<visitor-id>`. Live stores are kept in a `moka` cache and
//! dropped after a period of inactivity; since every mutation is already
//! persisted, an evicted cart is simply reloaded on the next request.
//!
//! A cart evicted while a request still holds it is not reloaded: the
//! registry keeps a weak handle to every store it hands out and reuses the
//! store while any handle is alive, so one visitor never has two stores.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, Weak};
use std::time::Duration;

use metalworks_core::VisitorId;
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::cart::CartStore;
use crate::storage::{CartStorage, visitor_cart_key};

/// Upper bound on carts held in memory at once.
const MAX_LIVE_CARTS: u64 = 10_000;

/// A cart shared between concurrent requests from one visitor.
///
/// The mutex serializes mutations so that each one reads the latest state.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// Registry of live cart stores keyed by visitor.
#[derive(Clone)]
pub struct CartRegistry {
    storage: Arc<dyn CartStorage>,
    live: Cache<VisitorId, SharedCart>,
    handed_out: Arc<std::sync::Mutex<HashMap<VisitorId, Weak<Mutex<CartStore>>>>>,
}

impl CartRegistry {
    /// Create a registry over `storage`; carts idle for `idle_timeout` are evicted.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, idle_timeout: Duration) -> Self {
        let live = Cache::builder()
            .max_capacity(MAX_LIVE_CARTS)
            .time_to_idle(idle_timeout)
            .build();

        Self {
            storage,
            live,
            handed_out: Arc::default(),
        }
    }

    /// Get the visitor's cart, loading it from storage if it is not live.
    pub async fn cart_for(&self, visitor: &VisitorId) -> SharedCart {
        let storage = Arc::clone(&self.storage);
        let handed_out = Arc::clone(&self.handed_out);
        let visitor_id = visitor.clone();

        self.live
            .get_with(visitor.clone(), async move {
                let mut handed_out = handed_out.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(cart) = handed_out.get(&visitor_id).and_then(Weak::upgrade) {
                    tracing::debug!(visitor = %visitor_id, "Re-caching cart still in use");
                    return cart;
                }

                let key = visitor_cart_key(&visitor_id);
                tracing::debug!(key = %key, "Loading cart into memory");
                let cart = Arc::new(Mutex::new(CartStore::load(storage, key)));

                handed_out.retain(|_, weak| weak.strong_count() > 0);
                handed_out.insert(visitor_id, Arc::downgrade(&cart));
                cart
            })
            .await
    }
}

impl std::fmt::Debug for CartRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartRegistry")
            .field("live", &self.live.entry_count())
            .finish_non_exhaustive()
    }
}
