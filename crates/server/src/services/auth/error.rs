//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid phone format.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] mashtal_core::PhoneError),

    /// Invalid display name.
    #[error("name validation failed: {0}")]
    InvalidName(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Bearer token missing, malformed, or expired.
    #[error("invalid token")]
    InvalidToken,

    /// Token could not be signed.
    #[error("token signing failed")]
    TokenCreation,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
