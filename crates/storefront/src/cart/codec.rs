//! Persisted cart format.
//!
//! A cart is written as a JSON array of `{ "product": {...}, "quantity": n }`
//! objects. Reading is tolerant: a blob that is not JSON or not an array
//! yields an empty cart, and individual entries that lack a product, a
//! product id or a positive whole quantity are dropped while the valid
//! entries are kept. A missing or non-numeric price does not drop the
//! entry; the line is kept unpriced.

use metalworks_core::CartLineItem;
use serde_json::Value;

use super::CartError;

/// Result of decoding a persisted cart.
#[derive(Debug, Default)]
pub struct DecodedCart {
    /// Valid line items in stored order, one per product id.
    pub items: Vec<CartLineItem>,
    /// Problems found while decoding; each one dropped data.
    pub problems: Vec<CartError>,
}

impl DecodedCart {
    /// Whether every stored entry was kept.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Serialize line items to the persisted format.
///
/// # Errors
///
/// Returns an error if serialization fails, which only happens for
/// non-string keys in product attributes.
pub fn encode(items: &[CartLineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decode a persisted cart, discarding anything malformed.
#[must_use]
pub fn decode(raw: &str) -> DecodedCart {
    let mut decoded = DecodedCart::default();

    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            decoded.problems.push(CartError::MalformedPersistedState(format!(
                "expected an array, found {}",
                json_kind(&other)
            )));
            return decoded;
        }
        Err(e) => {
            decoded
                .problems
                .push(CartError::MalformedPersistedState(e.to_string()));
            return decoded;
        }
    };

    for (index, entry) in entries.into_iter().enumerate() {
        let line = match serde_json::from_value::<CartLineItem>(entry) {
            Ok(line) => line,
            Err(e) => {
                decoded.problems.push(CartError::MalformedPersistedState(format!(
                    "entry {index}: {e}"
                )));
                continue;
            }
        };

        match decoded
            .items
            .iter_mut()
            .find(|existing| existing.product.id == line.product.id)
        {
            Some(existing) => match existing.quantity.checked_add(line.quantity) {
                Some(total) => existing.quantity = total,
                None => decoded.problems.push(CartError::MalformedPersistedState(format!(
                    "entry {index}: quantity for {} overflows",
                    line.product.id
                ))),
            },
            None => decoded.items.push(line),
        }
    }

    decoded
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use metalworks_core::{Product, ProductId, Quantity};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn line(id: &str, price: i64, quantity: i64) -> CartLineItem {
        CartLineItem::new(
            Product::new(
                ProductId::parse(id).unwrap(),
                format!("Product {id}"),
                Decimal::from(price),
                format!("/images/{id}.jpg"),
                "furniture",
            ),
            Quantity::new(quantity).unwrap(),
        )
    }

    fn ids(decoded: &DecodedCart) -> Vec<&str> {
        decoded.items.iter().map(|l| l.product.id.as_str()).collect()
    }

    #[test]
    fn test_encode_decode_preserves_order_and_quantities() {
        let items = vec![line("b", 100, 2), line("a", 250, 1), line("c", 5, 7)];
        let decoded = decode(&encode(&items).unwrap());

        assert!(decoded.is_clean());
        assert_eq!(decoded.items, items);
    }

    #[test]
    fn test_encoded_shape() {
        let encoded = encode(&[line("a", 100, 2)]).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value[0]["quantity"], json!(2));
        assert_eq!(value[0]["product"]["id"], json!("a"));
        assert_eq!(value[0]["product"]["category"], json!("furniture"));
        assert!(value[0]["product"]["price"].is_number());
    }

    #[test]
    fn test_not_json_is_empty() {
        let decoded = decode("{not json");
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.problems.len(), 1);
    }

    #[test]
    fn test_non_array_is_empty() {
        for raw in ["{}", "null", "42", "\"cart\""] {
            let decoded = decode(raw);
            assert!(decoded.items.is_empty(), "{raw}");
            assert!(matches!(
                decoded.problems.as_slice(),
                [CartError::MalformedPersistedState(_)]
            ));
        }
    }

    #[test]
    fn test_entry_without_product_id_is_dropped() {
        let raw = json!([
            { "product": { "id": "a", "title": "A", "price": 100, "image": "", "category": "c" }, "quantity": 2 },
            { "product": { "title": "No id", "price": 5 }, "quantity": 1 },
            { "product": { "id": "b", "title": "B", "price": 250, "image": "", "category": "c" }, "quantity": 1 }
        ])
        .to_string();

        let decoded = decode(&raw);
        assert_eq!(ids(&decoded), vec!["a", "b"]);
        assert_eq!(decoded.problems.len(), 1);
    }

    #[test]
    fn test_bad_entries_are_dropped() {
        let raw = json!([
            { "quantity": 1 },
            { "product": null, "quantity": 1 },
            { "product": { "id": "", "price": 1 }, "quantity": 1 },
            { "product": { "id": "zero", "price": 1 }, "quantity": 0 },
            { "product": { "id": "neg", "price": 1 }, "quantity": -3 },
            { "product": { "id": "frac", "price": 1 }, "quantity": 1.5 },
            { "product": { "id": "str", "price": 1 }, "quantity": "2" },
            "garbage",
            { "product": { "id": "ok", "price": "19.50" }, "quantity": 3 }
        ])
        .to_string();

        let decoded = decode(&raw);
        assert_eq!(ids(&decoded), vec!["ok"]);
        assert_eq!(decoded.items[0].product.price, Some(Decimal::new(1950, 2)));
        assert_eq!(decoded.problems.len(), 8);
    }

    #[test]
    fn test_unpriced_entries_are_kept() {
        let raw = json!([
            { "product": { "id": "a", "price": 100 }, "quantity": 2 },
            { "product": { "id": "b" }, "quantity": 3 },
            { "product": { "id": "c", "price": "n/a" }, "quantity": 1 }
        ])
        .to_string();

        let decoded = decode(&raw);
        assert!(decoded.is_clean());
        assert_eq!(ids(&decoded), vec!["a", "b", "c"]);
        assert_eq!(decoded.items[1].product.price, None);
        assert_eq!(decoded.items[2].product.price, None);
    }

    #[test]
    fn test_duplicate_ids_are_merged() {
        let raw = json!([
            { "product": { "id": "a", "price": 10 }, "quantity": 2 },
            { "product": { "id": "b", "price": 10 }, "quantity": 1 },
            { "product": { "id": "a", "price": 10 }, "quantity": 3 }
        ])
        .to_string();

        let decoded = decode(&raw);
        assert_eq!(ids(&decoded), vec!["a", "b"]);
        assert_eq!(decoded.items[0].quantity.get(), 5);
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_extra_product_attributes_roundtrip() {
        let raw = json!([
            { "product": { "id": "a", "price": 10, "finish": "raw steel" }, "quantity": 1 }
        ])
        .to_string();

        let decoded = decode(&raw);
        let reencoded: Value = serde_json::from_str(&encode(&decoded.items).unwrap()).unwrap();
        assert_eq!(reencoded[0]["product"]["finish"], json!("raw steel"));
    }
}
