//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mashtal_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form category (e.g., "Indoor Plants", "Pots").
    pub category: String,
    /// Product description.
    pub description: String,
    /// Price in currency units.
    pub price: Decimal,
    /// Shipping weight in kilograms.
    pub weight: Decimal,
    /// Units available for sale. Never negative.
    pub available_stock: i64,
    /// Reference to the product image.
    pub image_url: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub weight: Decimal,
    pub available_stock: i64,
    pub image_url: String,
}

/// Input for updating a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub available_stock: Option<i64>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_deserializes_from_request_json() {
        let input: CreateProductInput = serde_json::from_value(serde_json::json!({
            "name": "Monstera Deliciosa",
            "category": "indoor",
            "description": "Large split-leaf monstera",
            "price": "350.00",
            "weight": "2.5",
            "available_stock": 12,
            "image_url": "/images/monstera.webp"
        }))
        .expect("valid create payload");
        assert_eq!(input.price, Decimal::new(35000, 2));
    }

    #[test]
    fn test_update_input_accepts_partial_json() {
        let input: UpdateProductInput =
            serde_json::from_value(serde_json::json!({"price": "299.00"}))
                .expect("valid partial payload");
        assert_eq!(input.price, Some(Decimal::new(29900, 2)));
        assert!(input.name.is_none());
        assert!(input.available_stock.is_none());
    }
}
