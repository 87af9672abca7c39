//! Database operations for the Mashtal `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Storefront accounts (guests included)
//! - `products` - The catalog
//! - `shipping_zones` - Flat delivery cost per governorate
//! - `orders` / `order_items` - Persisted checkouts
//! - `settings` - Store-wide configuration
//!
//! All repositories use the runtime query API with explicit row structs that
//! are converted into domain types. Money columns are TEXT and parsed into
//! `Decimal` on the way out; a malformed value surfaces as
//! [`RepositoryError::DataCorruption`] rather than a panic.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded via
//! [`sqlx::migrate!`]. Run them with:
//! ```bash
//! cargo run -p mashtal-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod orders;
mod products;
mod settings;
mod shipping_zones;
mod users;

pub use orders::{CreateOrderError, NewOrder, NewOrderItem, OrderRepository};
pub use products::{ProductRepository, StockDecrement};
pub use settings::SettingsRepository;
pub use shipping_zones::ShippingZoneRepository;
pub use users::{
    GUEST_PASSWORD_SENTINEL, NO_LOGIN_SENTINEL, NewUser, UserCredentials, UserRepository,
};

/// Embedded migrations for the server database.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique phone or governorate).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Wrap an sqlx error, turning unique-constraint violations into
    /// [`Self::Conflict`] with the given message.
    fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(conflict_message.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign key enforcement is enabled on every connection; the database
/// file is created if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Parse a TEXT money column into a `Decimal`.
pub(crate) fn parse_decimal(column: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid decimal in {column}: {value:?} ({e})"))
    })
}
