//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use metalworks_core::{CurrencyCode, Price, Product};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::find_product;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: Option<String>,
}

impl ProductView {
    fn new(product: Product, currency: CurrencyCode) -> Self {
        let price_display = product
            .price
            .map(|amount| Price::new(amount, currency).display());
        Self {
            product,
            price_display,
        }
    }
}

/// Product listing filters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Product listing, optionally narrowed to one category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Json<Vec<ProductView>> {
    let catalog = state.catalog();
    let currency = catalog.currency();

    let products = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => catalog
            .products_in_category(category)
            .cloned()
            .map(|p| ProductView::new(p, currency))
            .collect(),
        _ => catalog
            .products()
            .iter()
            .cloned()
            .map(|p| ProductView::new(p, currency))
            .collect(),
    };

    Json(products)
}

/// Distinct product categories.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product = find_product(&state, &id)?;
    Ok(Json(ProductView::new(product, state.currency())))
}
