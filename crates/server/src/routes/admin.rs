//! Admin dashboard handlers.

use axum::{Json, extract::State};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::StoreStats;
use crate::state::AppState;

/// Store-wide aggregates for the admin dashboard (admin only).
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<StoreStats>, AppError> {
    let stats = OrderRepository::new(state.pool()).stats().await?;
    Ok(Json(stats))
}
