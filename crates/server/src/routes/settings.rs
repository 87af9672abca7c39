//! Store settings handlers.
//!
//! Settings are an open-ended key/value map (store name, contact info,
//! announcement banner). The map is public to read and replaced wholesale
//! by admins.

use axum::{Json, extract::State};
use serde_json::{Map, Value};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Get all store settings as a JSON object.
pub async fn show(State(state): State<AppState>) -> Result<Json<Map<String, Value>>, AppError> {
    let settings = SettingsRepository::new(state.pool()).get_all().await?;
    Ok(Json(settings))
}

/// Replace store settings (admin only).
///
/// Keys present in the body are upserted; keys absent from the body are
/// left untouched.
pub async fn replace(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let repo = SettingsRepository::new(state.pool());
    repo.set_all(&body).await?;
    let settings = repo.get_all().await?;
    Ok(Json(settings))
}
