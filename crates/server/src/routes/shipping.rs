//! Shipping zone handlers.
//!
//! The zone listing is public so the storefront can render governorate
//! choices with their delivery costs. Writes require an admin token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mashtal_core::types::ShippingZoneId;

use crate::db::ShippingZoneRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::{CreateZoneInput, ShippingZone, UpdateZoneInput};
use crate::state::AppState;

/// List all shipping zones.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ShippingZone>>, AppError> {
    let zones = ShippingZoneRepository::new(state.pool()).list().await?;
    Ok(Json(zones))
}

/// Create a shipping zone (admin only).
///
/// # Errors
///
/// Returns 409 if a zone for the governorate already exists.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateZoneInput>,
) -> Result<(StatusCode, Json<ShippingZone>), AppError> {
    let zone = ShippingZoneRepository::new(state.pool()).create(input).await?;
    tracing::info!(zone_id = %zone.id, governorate = %zone.governorate, "shipping zone created");
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Update a shipping zone (admin only).
///
/// # Errors
///
/// Returns 404 if the zone does not exist, 409 if renaming collides with
/// another governorate.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ShippingZoneId>,
    Json(input): Json<UpdateZoneInput>,
) -> Result<Json<ShippingZone>, AppError> {
    let zone = ShippingZoneRepository::new(state.pool())
        .update(id, input)
        .await?;
    Ok(Json(zone))
}

/// Delete a shipping zone (admin only).
///
/// # Errors
///
/// Returns 404 if the zone does not exist.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ShippingZoneId>,
) -> Result<StatusCode, AppError> {
    ShippingZoneRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
