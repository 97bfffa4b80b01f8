//! Read-only product catalog.
//!
//! The catalog is loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "currency": "USD",
//!   "products": [
//!     { "id": "gate-scroll", "title": "Scroll Garden Gate", "price": 1450,
//!       "image": "/images/gates/scroll.jpg", "category": "gates" }
//!   ]
//! }
//! ```
//!
//! Carts keep copies of products, so removing a product from the catalog
//! does not touch carts that already hold it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use metalworks_core::{CurrencyCode, Product, ProductId};
use serde::Deserialize;
use thiserror::Error;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
    #[error("catalog product {0} has no usable price")]
    MissingPrice(ProductId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    currency: Option<CurrencyCode>,
    products: Vec<Product>,
}

/// Product definitions, cheap to clone and share between handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: CurrencyCode,
    products: Arc<Vec<Product>>,
    index: Arc<HashMap<ProductId, usize>>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// `default_currency` applies when the file does not name a currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if two
    /// products share an id.
    pub fn load(path: &Path, default_currency: CurrencyCode) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw, default_currency)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid, ids repeat or a price is
    /// missing.
    pub fn from_json(raw: &str, default_currency: CurrencyCode) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_products(file.currency.unwrap_or(default_currency), file.products)
    }

    /// Build a catalog from products already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id, or
    /// [`CatalogError::MissingPrice`] if a product cannot be priced.
    pub fn from_products(
        currency: CurrencyCode,
        products: Vec<Product>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.price.is_none() {
                return Err(CatalogError::MissingPrice(product.id.clone()));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self {
            currency,
            products: Arc::new(products),
            index: Arc::new(index),
        })
    }

    /// Currency all catalog prices are expressed in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get_product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in self.products.iter() {
            let category = product.category.as_str();
            if !category.is_empty() && !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    /// Products whose category matches `category` (case-insensitive).
    pub fn products_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |product| product.category.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const CATALOG: &str = r#"{
        "currency": "EUR",
        "products": [
            { "id": "gate-1", "title": "Scroll Gate", "price": 1450, "image": "/g1.jpg", "category": "gates" },
            { "id": "rail-1", "title": "Stair Rail", "price": 89.5, "image": "/r1.jpg", "category": "railings" },
            { "id": "gate-2", "title": "Arched Gate", "price": 2100, "image": "/g2.jpg", "category": "Gates", "lead_time_weeks": 6 }
        ]
    }"#;

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::from_json(CATALOG, CurrencyCode::USD).unwrap();
        let id = ProductId::parse("rail-1").unwrap();

        let product = catalog.get_product_by_id(&id).unwrap();
        assert_eq!(product.title, "Stair Rail");
        assert_eq!(product.price, Some(Decimal::new(895, 1)));
        assert!(catalog
            .get_product_by_id(&ProductId::parse("nope").unwrap())
            .is_none());
        assert_eq!(catalog.currency(), CurrencyCode::EUR);
    }

    #[test]
    fn test_categories_and_filter() {
        let catalog = Catalog::from_json(CATALOG, CurrencyCode::USD).unwrap();
        assert_eq!(catalog.categories(), vec!["gates", "railings", "Gates"]);

        let gates: Vec<_> = catalog
            .products_in_category("gates")
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(gates, vec!["gate-1", "gate-2"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"{ "products": [
            { "id": "a", "price": 1 },
            { "id": "a", "price": 2 }
        ] }"#;
        assert!(matches!(
            Catalog::from_json(raw, CurrencyCode::USD),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_unpriced_products_rejected() {
        let raw = r#"{ "products": [
            { "id": "a", "price": 1 },
            { "id": "b", "price": "call us" }
        ] }"#;
        let err = Catalog::from_json(raw, CurrencyCode::USD).unwrap_err();
        assert!(matches!(err, CatalogError::MissingPrice(id) if id.as_str() == "b"));
    }

    #[test]
    fn test_currency_falls_back_to_default() {
        let catalog = Catalog::from_json(r#"{ "products": [] }"#, CurrencyCode::GBP).unwrap();
        assert_eq!(catalog.currency(), CurrencyCode::GBP);
        assert!(catalog.products().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/definitely/not/here.json"), CurrencyCode::USD).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let raw = include_str!("../catalog/products.json");
        let catalog = Catalog::from_json(raw, CurrencyCode::USD).unwrap();
        assert!(!catalog.products().is_empty());
        assert!(!catalog.categories().is_empty());
    }
}
