//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin account (prompts for the password)
//! mashtal-cli admin create -n "Admin Name" -p +201000000000
//! ```
//!
//! # Environment Variables
//!
//! - `MASHTAL_DATABASE_URL` - `SQLite` connection string
//!   (default: sqlite://mashtal.db)

use std::io::{BufRead, Write};

use mashtal_core::types::{Phone, PhoneError, UserRole};
use secrecy::SecretString;
use thiserror::Error;

use mashtal_server::db::{self, NewUser, RepositoryError, UserRepository};
use mashtal_server::services::auth::{self, AuthError};

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Database error: {0}")]
    Repository(RepositoryError),

    /// Invalid phone number.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password failed validation or hashing.
    #[error("Password error: {0}")]
    Password(#[from] AuthError),

    /// An account already uses this phone number.
    #[error("An account already exists for phone: {0}")]
    UserExists(String),

    /// Failed to read the password from stdin.
    #[error("Failed to read password: {0}")]
    Stdin(#[from] std::io::Error),
}

/// Create a new admin account.
///
/// Prompts for the password on stdin when `password` is `None`.
///
/// # Errors
///
/// Returns an error if validation fails, the phone is already taken, or
/// the database is unreachable.
pub async fn create(name: &str, phone: &str, password: Option<&str>) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let phone = Phone::parse(phone)?;

    let password = match password {
        Some(p) => p.to_owned(),
        None => prompt_password()?,
    };
    auth::validate_password(&password)?;
    let password_hash = auth::hash_password(&password)?;

    let database_url = std::env::var("MASHTAL_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mashtal.db".to_string());

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Creating admin account: {} ({})", name, phone.as_str());
    let user = UserRepository::new(&pool)
        .create(NewUser {
            name: name.to_owned(),
            phone: phone.clone(),
            password_hash,
            role: UserRole::Admin,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(phone.as_str().to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Admin account created with id {}", user.id);
    Ok(())
}

/// Read a password from stdin.
fn prompt_password() -> Result<String, std::io::Error> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
