//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! mw-cli catalog list
//! mw-cli catalog list --category gates
//! mw-cli catalog categories
//! ```

use std::fmt::Write as _;

use metalworks_core::{Price, Product};
use metalworks_storefront::catalog::Catalog;

/// Render products as one line each: id, price, title.
#[must_use]
pub fn list(catalog: &Catalog, category: Option<&str>) -> String {
    let products: Vec<&Product> = match category {
        Some(category) => catalog.products_in_category(category).collect(),
        None => catalog.products().iter().collect(),
    };

    let mut out = String::new();
    for product in products {
        let price = product
            .price
            .map_or_else(String::new, |amount| Price::new(amount, catalog.currency()).display());
        let _ = writeln!(
            out,
            "{:<28} {:>12}  {}",
            product.id.as_str(),
            price,
            product.title
        );
    }
    out
}

/// Render the distinct categories, one per line.
#[must_use]
pub fn categories(catalog: &Catalog) -> String {
    catalog
        .categories()
        .iter()
        .fold(String::new(), |mut out, category| {
            let _ = writeln!(out, "{category}");
            out
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use metalworks_core::CurrencyCode;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{ "products": [
                { "id": "gate-1", "title": "Scroll Gate", "price": 1450, "category": "gates" },
                { "id": "rail-1", "title": "Stair Rail", "price": 89.5, "category": "railings" }
            ] }"#,
            CurrencyCode::USD,
        )
        .unwrap()
    }

    #[test]
    fn test_list_filters_by_category() {
        let out = list(&catalog(), Some("railings"));
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("rail-1"));
        assert!(out.contains("$89.50"));
        assert!(out.contains("Stair Rail"));
    }

    #[test]
    fn test_list_all() {
        assert_eq!(list(&catalog(), None).lines().count(), 2);
    }

    #[test]
    fn test_categories() {
        assert_eq!(categories(&catalog()), "gates\nrailings\n");
    }
}
