//! Local cart commands.
//!
//! These operate on the same persisted cart a single-visitor storefront
//! would use (`metalworks:cart`), stored under `--data-dir`.
//!
//! # Usage
//!
//! ```bash
//! mw-cli cart add gate-scroll-garden --quantity 2
//! mw-cli cart update gate-scroll-garden 5
//! mw-cli cart remove gate-scroll-garden
//! mw-cli cart buy-now fire-pit-hex
//! mw-cli cart show
//! mw-cli cart clear
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use metalworks_core::{CurrencyCode, Price, ProductId};
use metalworks_storefront::cart::CartStore;
use metalworks_storefront::storage::keys;

use super::{CommandError, Context};

/// A cart mutation requested from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Show,
    Add { product_id: String, quantity: i64 },
    Update { product_id: String, quantity: i64 },
    Remove { product_id: String },
    Clear,
    BuyNow { product_id: String, quantity: i64 },
}

/// Apply `command` to the local cart and render the result.
///
/// # Errors
///
/// Returns an error if the product id is invalid, the quantity is rejected
/// or the cart cannot be written.
pub fn run(context: &Context, command: CartCommand) -> Result<String, CommandError> {
    let mut cart = CartStore::load(Arc::clone(&context.storage), keys::CART);
    let currency = context.catalog.currency();

    let mut notice = None;
    match command {
        CartCommand::Show => {}
        CartCommand::Add {
            product_id,
            quantity,
        } => cart.add_to_cart(context.product(&product_id)?, quantity)?,
        CartCommand::Update {
            product_id,
            quantity,
        } => cart.update_quantity(&ProductId::parse(product_id)?, quantity)?,
        CartCommand::Remove { product_id } => {
            cart.remove_from_cart(&ProductId::parse(product_id)?);
        }
        CartCommand::Clear => cart.clear_cart(),
        CartCommand::BuyNow {
            product_id,
            quantity,
        } => {
            let intent = cart.buy_now(context.product(&product_id)?, quantity)?;
            notice = Some(format!("Continue to checkout: {}\n", intent.path()));
        }
    }

    if !cart.is_persisted() {
        tracing::warn!(key = cart.key(), "Cart change was not saved");
    }

    let mut out = render(&cart, currency);
    if let Some(notice) = notice {
        out.push_str(&notice);
    }
    Ok(out)
}

/// Render cart lines followed by the count and subtotal.
#[must_use]
pub fn render(cart: &CartStore, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let line_total = line
            .line_total()
            .map_or_else(|| "-".to_string(), |amount| Price::new(amount, currency).display());
        let _ = writeln!(
            out,
            "{:<28} x{:<4} {:>12}  {}",
            line.product.id.as_str(),
            line.quantity.get(),
            line_total,
            line.product.title
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        cart.cart_count(),
        Price::new(cart.cart_total(), currency)
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use metalworks_storefront::catalog::Catalog;
    use metalworks_storefront::storage::FileStorage;

    use super::*;

    fn context(dir: &std::path::Path) -> Context {
        Context {
            catalog: Catalog::from_json(
                r#"{ "products": [
                    { "id": "gate-1", "title": "Scroll Gate", "price": 1450, "category": "gates" },
                    { "id": "rail-1", "title": "Stair Rail", "price": 89.5, "category": "railings" }
                ] }"#,
                CurrencyCode::USD,
            )
            .unwrap(),
            storage: Arc::new(FileStorage::open(dir).unwrap()),
        }
    }

    fn add(product_id: &str, quantity: i64) -> CartCommand {
        CartCommand::Add {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_cart_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        run(&ctx, add("gate-1", 1)).unwrap();
        run(&ctx, add("gate-1", 2)).unwrap();
        let out = run(&ctx, CartCommand::Show).unwrap();

        assert!(out.contains("x3"));
        assert!(out.contains("3 item(s), subtotal $4350.00"));
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        run(&ctx, add("rail-1", 2)).unwrap();
        let out = run(
            &ctx,
            CartCommand::Update {
                product_id: "rail-1".to_string(),
                quantity: 0,
            },
        )
        .unwrap();

        assert_eq!(out, "Cart is empty\n");
    }

    #[test]
    fn test_buy_now_replaces_cart() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        run(&ctx, add("gate-1", 4)).unwrap();
        let out = run(
            &ctx,
            CartCommand::BuyNow {
                product_id: "rail-1".to_string(),
                quantity: 1,
            },
        )
        .unwrap();

        assert!(!out.contains("gate-1"));
        assert!(out.contains("rail-1"));
        assert!(out.ends_with("Continue to checkout: /checkout\n"));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let err = run(&ctx, add("nope", 1)).unwrap_err();
        assert!(matches!(err, CommandError::UnknownProduct(_)));
    }

    #[test]
    fn test_negative_add_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let err = run(&ctx, add("gate-1", -1)).unwrap_err();
        assert!(matches!(err, CommandError::Cart(e) if e.is_invalid_argument()));
    }
}
