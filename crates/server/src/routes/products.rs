//! Product catalog handlers.
//!
//! Reads are public; writes require an admin token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mashtal_core::types::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::{CreateProductInput, Product, UpdateProductInput};
use crate::state::AppState;

/// List all products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Get a single product by id.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;
    Ok(Json(product))
}

/// Create a product (admin only).
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductRepository::new(state.pool()).create(input).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin only). Absent fields are left unchanged.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool()).update(id, input).await?;
    Ok(Json(product))
}

/// Delete a product (admin only).
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    ProductRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
