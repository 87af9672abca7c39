//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mashtal-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MASHTAL_DATABASE_URL` - `SQLite` connection string
//!   (default: sqlite://mashtal.db)

use secrecy::SecretString;
use thiserror::Error;

use mashtal_server::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MASHTAL_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mashtal.db".to_string());

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
