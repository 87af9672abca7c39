//! Aggregated store statistics for the admin dashboard.

use rust_decimal::Decimal;
use serde::Serialize;

use mashtal_core::ProductId;

/// A product ranked by lifetime units sold.
#[derive(Debug, Clone, Serialize)]
pub struct BestSellingProduct {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    /// Total units across all orders, regardless of order status.
    pub total_sold: i64,
}

/// Store-wide aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_users: i64,
    pub total_orders: i64,
    /// Sum of order totals across all orders.
    pub total_revenue: Decimal,
    /// Top products by units sold, best first. Capped at five; products
    /// removed from the catalog are excluded.
    pub best_selling_products: Vec<BestSellingProduct>,
}
