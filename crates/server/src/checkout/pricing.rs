//! Cart pricing: line totals, delivery cost, order total.
//!
//! Pure computation over already-loaded catalog data. Unit prices always
//! come from the current product record, never from the client; the result
//! carries the per-line snapshots that get persisted on the order items.

use std::collections::HashMap;

use rust_decimal::Decimal;

use mashtal_core::ProductId;

use super::{CheckoutError, CheckoutItem};
use crate::db::NewOrderItem;
use crate::models::product::Product;

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price snapshot from the product record.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub line_total: Decimal,
}

/// A fully priced cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub delivery_cost: Decimal,
    /// Sum of line totals plus delivery cost.
    pub total: Decimal,
}

impl PricedCart {
    /// Convert the priced lines into order items ready to persist.
    #[must_use]
    pub fn into_items(self) -> Vec<NewOrderItem> {
        self.lines
            .into_iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

/// Price a cart against the catalog.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty item list,
/// `InvalidQuantity` for a non-positive quantity, or `ProductNotFound` if a
/// line references a product missing from `products`.
pub fn price_cart(
    items: &[CheckoutItem],
    products: &HashMap<ProductId, Product>,
    delivery_cost: Decimal,
) -> Result<PricedCart, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = delivery_cost;

    for item in items {
        if item.quantity < 1 {
            return Err(CheckoutError::InvalidQuantity {
                product_id: item.product_id,
            });
        }
        let product = products
            .get(&item.product_id)
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;

        let line_total = product.price * Decimal::from(item.quantity);
        total += line_total;
        lines.push(PricedLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    Ok(PricedCart {
        lines,
        delivery_cost,
        total,
    })
}
