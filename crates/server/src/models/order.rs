//! Order domain types.
//!
//! An order exclusively owns its items: they are created together in one
//! transaction and deleted together. Items hold a non-owning reference to
//! their product plus a price snapshot taken at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use mashtal_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::user::User;

/// A persisted order (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user (registered or synthesized guest).
    pub user_id: UserId,
    /// Sum of line totals plus delivery cost. Always server-computed.
    pub total_price: Decimal,
    /// How the order is paid.
    pub payment_method: PaymentMethod,
    /// Free-text delivery address. For guest orders the customer's contact
    /// details are folded in.
    pub shipping_address: String,
    /// Destination governorate.
    pub governorate: String,
    /// Flat delivery cost resolved from the shipping zone at checkout.
    pub delivery_cost: Decimal,
    /// Current fulfillment status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A single line item within an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product, `None` once the product has been removed from
    /// the catalog; the item keeps its snapshot either way.
    pub product_id: Option<ProductId>,
    /// Ordered quantity. Always positive.
    pub quantity: i64,
    /// Unit price captured at checkout.
    pub unit_price: Decimal,
}

/// An order item joined with display details of its product.
///
/// Product fields are nullable: the product may have been deleted since the
/// order was placed, in which case only the snapshot survives.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemWithProduct {
    #[serde(flatten)]
    pub item: OrderItem,
    /// Product name at read time, if the product still exists.
    pub product_name: Option<String>,
    /// Product image at read time, if the product still exists.
    pub product_image_url: Option<String>,
}

impl OrderItemWithProduct {
    /// Line total for this item (snapshot price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.unit_price * Decimal::from(self.item.quantity)
    }
}

/// An order together with its items, as returned to the customer.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemWithProduct>,
}

/// An order with its owning user and items, as listed in the admin panel.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: Order,
    pub user: User,
    pub items: Vec<OrderItemWithProduct>,
}
