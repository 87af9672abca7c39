//! The checkout workflow: turn a cart into a persisted order.
//!
//! A checkout request flows through four steps:
//!
//! 1. **Validation** of the explicit input schema (unknown fields are
//!    rejected at deserialization; totals and delivery costs are never
//!    accepted from the client).
//! 2. **Pricing** ([`pricing`]): delivery cost from the shipping zone,
//!    unit prices from the current catalog, total = lines + delivery.
//! 3. **Identity resolution** ([`identity`]): attribute the order to the
//!    authenticated user, or synthesize a guest account.
//! 4. **Assembly**: [`crate::db::OrderRepository::create`] decrements stock
//!    and persists the order and its items in one transaction.
//!
//! All policies are strict: an unknown governorate, a dead product
//! reference, or insufficient stock fails the whole request and persists
//! nothing.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::SqlitePool;

use mashtal_core::{PaymentMethod, ProductId};

use crate::db::{
    CreateOrderError, NewOrder, OrderRepository, ProductRepository, RepositoryError,
    ShippingZoneRepository, UserRepository,
};
use crate::models::order::OrderWithItems;
use crate::models::product::Product;
use crate::services::auth::AuthIdentity;

pub mod identity;
pub mod pricing;

/// One requested cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// The checkout request body.
///
/// This is the single accepted shape; aliases for the same concept (e.g.
/// `address` vs `shipping_address`) and client-supplied totals are rejected
/// as unknown fields rather than silently coalesced.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    /// Requested line items.
    pub items: Vec<CheckoutItem>,
    /// How the order will be paid. Defaults to cash on delivery.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Destination governorate; must have a configured shipping zone.
    pub governorate: String,
    /// Free-text delivery address.
    pub shipping_address: String,
    /// Customer display name, used for guest attribution.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Customer contact phone, folded into the address for guest orders.
    #[serde(default)]
    pub customer_phone: Option<String>,
}

/// Error type for the checkout workflow.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no line items.
    #[error("order must contain at least one item")]
    EmptyCart,

    /// A line has a non-positive quantity.
    #[error("quantity for product {product_id} must be at least 1")]
    InvalidQuantity { product_id: ProductId },

    /// No destination governorate was supplied.
    #[error("governorate is required")]
    MissingGovernorate,

    /// No shipping address was supplied.
    #[error("shipping address is required")]
    MissingAddress,

    /// No shipping zone is configured for the requested governorate.
    #[error("no shipping zone configured for governorate {0:?}")]
    UnknownGovernorate(String),

    /// A line references a product that does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A line requested more units than are available.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CreateOrderError> for CheckoutError {
    fn from(err: CreateOrderError) -> Self {
        match err {
            CreateOrderError::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            CreateOrderError::ProductMissing(id) => Self::ProductNotFound(id),
            CreateOrderError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Run the checkout workflow end to end.
///
/// # Errors
///
/// Returns a [`CheckoutError`] describing the first failed step; on any
/// error no order is persisted and no stock is consumed.
pub async fn place_order(
    pool: &SqlitePool,
    auth: Option<&AuthIdentity>,
    request: CheckoutRequest,
) -> Result<OrderWithItems, CheckoutError> {
    validate(&request)?;

    let governorate = request.governorate.trim().to_string();
    let zone = ShippingZoneRepository::new(pool)
        .get_by_governorate(&governorate)
        .await?
        .ok_or_else(|| CheckoutError::UnknownGovernorate(governorate.clone()))?;

    let products = load_products(pool, &request.items).await?;
    let priced = pricing::price_cart(&request.items, &products, zone.cost)?;

    let users = UserRepository::new(pool);
    let user =
        identity::resolve_order_user(&users, auth, request.customer_name.as_deref()).await?;

    let shipping_address = compose_shipping_address(&request, auth.is_some());

    let created = OrderRepository::new(pool)
        .create(NewOrder {
            user_id: user.id,
            total_price: priced.total,
            payment_method: request.payment_method,
            shipping_address,
            governorate,
            delivery_cost: priced.delivery_cost,
            items: priced.into_items(),
        })
        .await?;

    tracing::info!(
        order_id = %created.order.id,
        user_id = %user.id,
        total = %created.order.total_price,
        "order placed"
    );

    Ok(created)
}

/// Check the request invariants that don't need the database.
fn validate(request: &CheckoutRequest) -> Result<(), CheckoutError> {
    if request.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    for item in &request.items {
        if item.quantity < 1 {
            return Err(CheckoutError::InvalidQuantity {
                product_id: item.product_id,
            });
        }
    }
    if request.governorate.trim().is_empty() {
        return Err(CheckoutError::MissingGovernorate);
    }
    if request.shipping_address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    Ok(())
}

/// Load every referenced product, failing on the first dead reference.
async fn load_products(
    pool: &SqlitePool,
    items: &[CheckoutItem],
) -> Result<HashMap<ProductId, Product>, CheckoutError> {
    let repo = ProductRepository::new(pool);
    let mut products = HashMap::with_capacity(items.len());
    for item in items {
        if products.contains_key(&item.product_id) {
            continue;
        }
        let product = repo
            .get(item.product_id)
            .await?
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;
        products.insert(item.product_id, product);
    }
    Ok(products)
}

/// Build the stored shipping address.
///
/// Guest orders have no account to look contact details up on later, so the
/// customer's name and phone are folded into the address text.
fn compose_shipping_address(request: &CheckoutRequest, authenticated: bool) -> String {
    let address = request.shipping_address.trim();
    if authenticated {
        return address.to_string();
    }
    let name = request.customer_name.as_deref().unwrap_or("Guest");
    let phone = request.customer_phone.as_deref().unwrap_or("no phone");
    format!("{name} | {phone}\n{address}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<CheckoutItem>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            payment_method: PaymentMethod::Cash,
            governorate: "Cairo".to_string(),
            shipping_address: "12 Nile St".to_string(),
            customer_name: None,
            customer_phone: None,
        }
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        assert!(matches!(
            validate(&request(vec![])),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let req = request(vec![CheckoutItem {
            product_id: ProductId::new(1),
            quantity: 0,
        }]);
        assert!(matches!(
            validate(&req),
            Err(CheckoutError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_validate_requires_destination() {
        let mut req = request(vec![CheckoutItem {
            product_id: ProductId::new(1),
            quantity: 1,
        }]);
        req.governorate = "  ".to_string();
        assert!(matches!(
            validate(&req),
            Err(CheckoutError::MissingGovernorate)
        ));

        req.governorate = "Cairo".to_string();
        req.shipping_address = String::new();
        assert!(matches!(validate(&req), Err(CheckoutError::MissingAddress)));
    }

    #[test]
    fn test_request_schema_rejects_total_override() {
        // Client-supplied totals are not part of the schema; the old
        // behavior of trusting them was a defect.
        let body = serde_json::json!({
            "items": [{"product_id": 1, "quantity": 2}],
            "governorate": "Cairo",
            "shipping_address": "12 Nile St",
            "total_amount": "1.00",
        });
        assert!(serde_json::from_value::<CheckoutRequest>(body).is_err());
    }

    #[test]
    fn test_guest_address_includes_contact_details() {
        let mut req = request(vec![]);
        req.customer_name = Some("Mona".to_string());
        req.customer_phone = Some("01001234567".to_string());

        let guest = compose_shipping_address(&req, false);
        assert_eq!(guest, "Mona | 01001234567\n12 Nile St");

        let authed = compose_shipping_address(&req, true);
        assert_eq!(authed, "12 Nile St");
    }
}
