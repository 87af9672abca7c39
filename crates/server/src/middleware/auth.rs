//! Authentication extractors.
//!
//! Route handlers declare what they need: [`RequireAuth`] for any verified
//! account, [`RequireAdmin`] for administrators, [`OptionalAuth`] where an
//! anonymous caller is fine (guest checkout). Tokens arrive as
//! `Authorization: Bearer <jwt>` headers and are verified by the
//! [`AuthService`](crate::services::auth::AuthService) held in app state.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;
use crate::services::auth::AuthIdentity;
use crate::state::AppState;

/// Extractor that requires a verified identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(
///     State(state): State<AppState>,
///     RequireAuth(identity): RequireAuth,
/// ) -> Result<Json<Vec<OrderWithItems>>> { /* ... */ }
/// ```
pub struct RequireAuth(pub AuthIdentity);

/// Extractor that requires a verified identity with the admin role.
pub struct RequireAdmin(pub AuthIdentity);

/// Extractor that yields the identity when a valid token is present, and
/// `None` otherwise.
///
/// A present-but-invalid token is still rejected; silently downgrading a
/// bad token to an anonymous request would mask client bugs.
pub struct OptionalAuth(pub Option<AuthIdentity>);

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("malformed authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("expected bearer token".to_string()))?;
    Ok(Some(token))
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))?;
        let identity = state.auth().verify_token(token)?;
        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }
        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(Self(None)),
            Some(token) => {
                let identity = state.auth().verify_token(token)?;
                Ok(Self(Some(identity)))
            }
        }
    }
}
