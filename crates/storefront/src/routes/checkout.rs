//! Checkout route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::checkout::{CheckoutSummary, PaymentConfirmation, complete_checkout};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::routes::cart::NavigationResponse;
use crate::state::AppState;

/// Summary of what the visitor is about to pay for.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn show(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
) -> Json<CheckoutSummary> {
    let shared = state.carts().cart_for(&visitor).await;
    let cart = shared.lock().await;
    Json(CheckoutSummary::from_store(&cart, state.currency()))
}

/// Head to checkout with the current cart.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn begin(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
) -> Result<Json<NavigationResponse>> {
    let shared = state.carts().cart_for(&visitor).await;
    let intent = shared.lock().await.begin_checkout()?;
    Ok(Json(intent.into()))
}

/// Payment gateway confirmation; clears the cart.
#[instrument(skip_all, fields(visitor = %visitor))]
pub async fn complete(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<CheckoutSummary>> {
    let shared = state.carts().cart_for(&visitor).await;
    let mut cart = shared.lock().await;
    let summary = complete_checkout(&mut cart, state.currency(), &confirmation)?;

    add_breadcrumb(
        "checkout",
        "Checkout completed",
        Some(&[("payment_reference", confirmation.payment_reference.as_str())]),
    );
    Ok(Json(summary))
}
