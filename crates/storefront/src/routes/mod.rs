//! HTTP route handlers for the storefront.
//!
//! All responses are JSON. Carts are scoped to the visitor id kept in the
//! session cookie.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (?category=gates)
//! GET  /products/categories    - Distinct categories
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart contents, subtotal and count
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add to cart ({product_id, quantity?})
//! POST /cart/update            - Set quantity ({product_id, quantity})
//! POST /cart/remove            - Remove item ({product_id})
//! POST /cart/clear             - Empty the cart
//! POST /cart/open              - Show the cart surface
//! POST /cart/close             - Hide the cart surface
//! POST /buy-now                - Replace cart with one product, go to checkout
//!
//! # Checkout
//! GET  /checkout               - Checkout summary
//! POST /checkout               - Head to checkout with the current cart
//! POST /checkout/complete      - Payment confirmed ({payment_reference})
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::begin))
        .route("/complete", post(checkout::complete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/buy-now", post(cart::buy_now))
        .nest("/checkout", checkout_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
