//! Catalog product definition.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A product offered by the shop.
///
/// Products are owned by the catalog; carts only hold copies. The `price`
/// is an amount in the store currency and is written as a JSON number. A
/// price that is missing or not numeric reads as `None` rather than failing,
/// so a stale cart entry keeps its line even when it cannot be priced.
/// Any extra attributes (finish, dimensions, lead time, ...) are kept in
/// `attributes` so they survive a save/load cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient_price",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra attributes.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price: Some(price),
            image: image.into(),
            category: category.into(),
            attributes: Map::new(),
        }
    }
}

/// Accept a JSON number or numeric string; anything else is no price.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(raw) => parse_decimal(raw.trim()),
        _ => None,
    };
    Ok(parsed)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_extra_attributes() {
        let product: Product = serde_json::from_value(json!({
            "id": "gate-1",
            "title": "Scroll Gate",
            "price": 1450.5,
            "image": "/images/gates/scroll.jpg",
            "category": "gates",
            "finish": "powder coat"
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "gate-1");
        assert_eq!(product.price, Some(Decimal::new(14_505, 1)));
        assert_eq!(product.attributes.get("finish"), Some(&json!("powder coat")));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["finish"], json!("powder coat"));
        assert_eq!(value["price"], json!(1450.5));
    }

    #[test]
    fn test_price_accepts_numeric_string() {
        let product: Product =
            serde_json::from_value(json!({ "id": "rail-1", "price": "99.95" })).unwrap();
        assert_eq!(product.price, Some(Decimal::new(9995, 2)));
        assert!(product.title.is_empty());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_value::<Product>(json!({ "price": 10 })).is_err());
        assert!(serde_json::from_value::<Product>(json!({ "id": "", "price": 10 })).is_err());
    }

    #[test]
    fn test_unusable_price_reads_as_none() {
        for raw in [
            json!({ "id": "a" }),
            json!({ "id": "a", "price": null }),
            json!({ "id": "a", "price": "lots" }),
            json!({ "id": "a", "price": true }),
            json!({ "id": "a", "price": { "amount": 3 } }),
        ] {
            let product: Product = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(product.price, None, "{raw}");
        }
    }

    #[test]
    fn test_unpriced_product_omits_price() {
        let mut product = Product::new(
            ProductId::parse("a").unwrap(),
            "A",
            Decimal::ONE,
            "",
            "gates",
        );
        product.price = None;

        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("price").is_none());
        assert_eq!(serde_json::from_value::<Product>(value).unwrap(), product);
    }

    #[test]
    fn test_scientific_price() {
        let product: Product =
            serde_json::from_value(json!({ "id": "a", "price": 1.5e3 })).unwrap();
        assert_eq!(product.price, Some(Decimal::from(1500)));
    }
}
