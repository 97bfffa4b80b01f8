//! Cart route handlers.
//!
//! Each visitor's cart is looked up through the session's visitor id. All
//! mutation handlers respond with the updated cart so UI surfaces can
//! re-render from a single response.

use axum::{Json, extract::State};
use metalworks_core::{CurrencyCode, Price, Product, ProductId, VisitorId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::CartStore;
use crate::checkout::NavigationIntent;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub title: String,
    pub image: String,
    pub category: String,
    pub quantity: u32,
    /// `None` for a stored line whose product has no usable price.
    pub price: Option<String>,
    pub line_price: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
    pub is_open: bool,
}

impl CartView {
    /// Render the current state of `cart` in `currency`.
    #[must_use]
    pub fn from_store(cart: &CartStore, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product.id.to_string(),
                    title: line.product.title.clone(),
                    image: line.product.image.clone(),
                    category: line.product.category.clone(),
                    quantity: line.quantity.get(),
                    price: line
                        .product
                        .price
                        .map(|amount| Price::new(amount, currency).display()),
                    line_price: line
                        .line_total()
                        .map(|amount| Price::new(amount, currency).display()),
                })
                .collect(),
            subtotal: Price::new(cart.cart_total(), currency).display(),
            item_count: cart.cart_count(),
            is_open: cart.is_cart_open(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Where the client should go next.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub redirect: &'static str,
    pub intent: NavigationIntent,
}

impl From<NavigationIntent> for NavigationResponse {
    fn from(intent: NavigationIntent) -> Self {
        Self {
            redirect: intent.path(),
            intent,
        }
    }
}

const fn default_quantity() -> i64 {
    1
}

/// Add to cart / buy now request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: String,
}

// =============================================================================
// Helpers
// =============================================================================

pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(format!("product_id: {e}")))
}

/// Resolve a product id through the catalog.
pub(crate) fn find_product(state: &AppState, raw: &str) -> Result<Product> {
    let id = parse_product_id(raw)?;
    state
        .catalog()
        .get_product_by_id(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn show(State(state): State<AppState>, Visitor(visitor): Visitor) -> Json<CartView> {
    let shared = state.carts().cart_for(&visitor).await;
    let cart = shared.lock().await;
    Json(CartView::from_store(&cart, state.currency()))
}

/// Cart count badge.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn count(State(state): State<AppState>, Visitor(visitor): Visitor) -> Json<CartCount> {
    let shared = state.carts().cart_for(&visitor).await;
    let count = shared.lock().await.cart_count();
    Json(CartCount { count })
}

/// Add a catalog product to the cart, accumulating quantity.
#[instrument(skip_all, fields(visitor = %visitor, product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, &request.product_id)?;

    let shared = state.carts().cart_for(&visitor).await;
    let mut cart = shared.lock().await;
    cart.add_to_cart(product, request.quantity)?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", request.product_id.as_str())]),
    );
    Ok(Json(CartView::from_store(&cart, state.currency())))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip_all, fields(visitor = %visitor, product_id = %request.product_id))]
pub async fn update(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let product_id = parse_product_id(&request.product_id)?;

    let shared = state.carts().cart_for(&visitor).await;
    let mut cart = shared.lock().await;
    cart.update_quantity(&product_id, request.quantity)?;

    Ok(Json(CartView::from_store(&cart, state.currency())))
}

/// Remove a line from the cart.
#[instrument(skip_all, fields(visitor = %visitor, product_id = %request.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let product_id = parse_product_id(&request.product_id)?;

    let shared = state.carts().cart_for(&visitor).await;
    let mut cart = shared.lock().await;
    cart.remove_from_cart(&product_id);

    Ok(Json(CartView::from_store(&cart, state.currency())))
}

/// Empty the cart.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn clear(State(state): State<AppState>, Visitor(visitor): Visitor) -> Json<CartView> {
    let shared = state.carts().cart_for(&visitor).await;
    let mut cart = shared.lock().await;
    cart.clear_cart();
    Json(CartView::from_store(&cart, state.currency()))
}

/// Show the cart surface.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn open(State(state): State<AppState>, Visitor(visitor): Visitor) -> Json<CartView> {
    set_open(&state, &visitor, true).await
}

/// Hide the cart surface.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn close(State(state): State<AppState>, Visitor(visitor): Visitor) -> Json<CartView> {
    set_open(&state, &visitor, false).await
}

async fn set_open(
    state: &AppState,
    visitor: &VisitorId,
    open: bool,
) -> Json<CartView> {
    let shared = state.carts().cart_for(visitor).await;
    let mut cart = shared.lock().await;
    cart.set_cart_open(open);
    Json(CartView::from_store(&cart, state.currency()))
}

/// Replace the cart with one product and send the visitor to checkout.
#[instrument(skip_all, fields(visitor = %visitor, product_id = %request.product_id))]
pub async fn buy_now(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<NavigationResponse>> {
    let product = find_product(&state, &request.product_id)?;

    let shared = state.carts().cart_for(&visitor).await;
    let intent = shared.lock().await.buy_now(product, request.quantity)?;

    add_breadcrumb(
        "cart",
        "Buy now",
        Some(&[("product_id", request.product_id.as_str())]),
    );
    Ok(Json(intent.into()))
}
