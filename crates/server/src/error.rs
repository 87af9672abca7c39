//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Clients get a JSON `{"error": "..."}` body with a
//! short message; 5xx responses never include internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout workflow failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map a repository error to a status code.
const fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidPhone(_)
                | AuthError::InvalidName(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(err) => repository_status(err),
                AuthError::TokenCreation | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart
                | CheckoutError::InvalidQuantity { .. }
                | CheckoutError::MissingGovernorate
                | CheckoutError::MissingAddress
                | CheckoutError::UnknownGovernorate(_) => StatusCode::BAD_REQUEST,
                CheckoutError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CheckoutError::Repository(err) => repository_status(err),
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client. Server errors get a generic body.
    fn client_message(&self) -> String {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return "Internal server error".to_string();
        }
        match self {
            Self::Database(err) | Self::Auth(AuthError::Repository(err)) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry; client errors are just noise.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
