//! Cart mutations as values, and the pure reducer that applies them.
//!
//! The reducer never touches storage or subscribers; [`super::CartStore`]
//! persists and publishes whatever [`Transition::Changed`] it gets back.

use metalworks_core::{CartLineItem, Product, ProductId, Quantity};

use super::CartError;

/// A requested change to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `quantity` units, appending a new line or growing an existing one.
    Add { product: Product, quantity: i64 },
    /// Drop the line for `product_id`, if any.
    Remove { product_id: ProductId },
    /// Set the quantity of an existing line; `<= 0` removes it.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Empty the cart.
    Clear,
    /// Discard everything and keep a single line (buy now).
    Replace { product: Product, quantity: i64 },
}

impl CartAction {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
            Self::Replace { .. } => "replace",
        }
    }
}

/// Outcome of reducing an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The cart has new contents.
    Changed(Vec<CartLineItem>),
    /// The action had no effect (e.g. removing an absent product).
    Unchanged,
}

/// Compute the next cart contents for `action`.
///
/// # Errors
///
/// Returns [`CartError::InvalidArgument`] if an add or replace quantity is
/// not positive, a quantity does not fit in a `u32`, or accumulating would
/// overflow. The current contents are never modified.
pub fn reduce(items: &[CartLineItem], action: &CartAction) -> Result<Transition, CartError> {
    match action {
        CartAction::Add { product, quantity } => add(items, product, *quantity),
        CartAction::Remove { product_id } => Ok(remove(items, product_id)),
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => update_quantity(items, product_id, *quantity),
        CartAction::Clear => Ok(Transition::Changed(Vec::new())),
        CartAction::Replace { product, quantity } => replace(product, *quantity),
    }
}

fn add(items: &[CartLineItem], product: &Product, quantity: i64) -> Result<Transition, CartError> {
    let quantity = Quantity::new(quantity).map_err(|e| CartError::invalid_quantity(&e))?;
    let mut next = items.to_vec();

    match next.iter_mut().find(|line| line.product_id() == &product.id) {
        Some(line) => {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::quantity_overflow(&product.id))?;
        }
        None => next.push(CartLineItem::new(product.clone(), quantity)),
    }

    Ok(Transition::Changed(next))
}

fn remove(items: &[CartLineItem], product_id: &ProductId) -> Transition {
    if !items.iter().any(|line| line.product_id() == product_id) {
        return Transition::Unchanged;
    }
    Transition::Changed(
        items
            .iter()
            .filter(|line| line.product_id() != product_id)
            .cloned()
            .collect(),
    )
}

fn update_quantity(
    items: &[CartLineItem],
    product_id: &ProductId,
    quantity: i64,
) -> Result<Transition, CartError> {
    if quantity <= 0 {
        return Ok(remove(items, product_id));
    }
    let quantity = Quantity::new(quantity).map_err(|e| CartError::invalid_quantity(&e))?;

    let Some(position) = items
        .iter()
        .position(|line| line.product_id() == product_id)
    else {
        return Ok(Transition::Unchanged);
    };

    let mut next = items.to_vec();
    if let Some(line) = next.get_mut(position) {
        if line.quantity == quantity {
            return Ok(Transition::Unchanged);
        }
        line.quantity = quantity;
    }
    Ok(Transition::Changed(next))
}

fn replace(product: &Product, quantity: i64) -> Result<Transition, CartError> {
    let quantity = Quantity::new(quantity).map_err(|e| CartError::invalid_quantity(&e))?;
    Ok(Transition::Changed(vec![CartLineItem::new(
        product.clone(),
        quantity,
    )]))
}
