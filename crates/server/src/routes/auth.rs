//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Request body for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Response for successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Register a new account.
///
/// # Errors
///
/// Returns 400 for invalid name/phone/password, 409 if the phone number
/// is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, token) = state
        .auth()
        .register(state.pool(), &body.name, &body.phone, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "account registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Login with phone and password.
///
/// # Errors
///
/// Returns 401 for wrong phone/password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = state
        .auth()
        .login(state.pool(), &body.phone, &body.password)
        .await?;

    Ok(Json(AuthResponse { token, user }))
}
