//! Order handlers: checkout, order history, and admin fulfilment.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mashtal_core::types::{OrderId, OrderStatus};
use serde::Deserialize;

use crate::checkout::{self, CheckoutRequest};
use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::auth::{OptionalAuth, RequireAdmin, RequireAuth};
use crate::models::{Order, OrderWithItems, OrderWithUser};
use crate::state::AppState;

/// Place an order.
///
/// Works for both guests and authenticated callers; a bearer token, when
/// present, attaches the order to that account.
///
/// # Errors
///
/// Returns 400 for an invalid cart or unknown governorate, 404 for a
/// missing product, 409 when stock is insufficient. On any error nothing
/// is persisted.
pub async fn create(
    OptionalAuth(auth): OptionalAuth,
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderWithItems>), AppError> {
    let order = checkout::place_order(state.pool(), auth.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's orders, newest first.
pub async fn mine(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithItems>>, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(auth.user_id)
        .await?;
    Ok(Json(orders))
}

/// List all orders with customer details (admin only).
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithUser>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Advance an order's status (admin only).
///
/// Only the single next step in the fulfilment sequence is accepted
/// (pending -> processing -> shipped -> delivered).
///
/// # Errors
///
/// Returns 404 if the order does not exist, 400 for an out-of-sequence
/// target status, 409 if the order changed concurrently.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let orders = OrderRepository::new(state.pool());

    let order = orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    if !order.status.can_transition_to(body.status) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {} to {}",
            order.status, body.status
        )));
    }

    let updated = orders.transition_status(id, order.status, body.status).await?;
    tracing::info!(order_id = %id, status = %updated.status, "order status updated");
    Ok(Json(updated))
}
