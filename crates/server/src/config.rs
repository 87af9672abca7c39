//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MASHTAL_JWT_SECRET` - Token signing secret (min 32 chars, no
//!   placeholder values)
//!
//! ## Optional
//! - `MASHTAL_DATABASE_URL` - `SQLite` connection string
//!   (default: sqlite://mashtal.db)
//! - `MASHTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `MASHTAL_PORT` - Listen port (default: 3000)
//! - `MASHTAL_TOKEN_TTL_HOURS` - Bearer token lifetime (default: 168)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` connection string
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Bearer token lifetime in hours
    pub token_ttl_hours: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the JWT secret fails validation (length, placeholder
    /// detection).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("MASHTAL_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://mashtal.db".to_string());

        let host = std::env::var("MASHTAL_HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MASHTAL_HOST".to_string(), e.to_string()))?;

        let port = std::env::var("MASHTAL_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MASHTAL_PORT".to_string(), e.to_string()))?;

        let jwt_secret = std::env::var("MASHTAL_JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("MASHTAL_JWT_SECRET".to_string()))?;
        validate_secret("MASHTAL_JWT_SECRET", &jwt_secret)?;

        let token_ttl_hours = std::env::var("MASHTAL_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MASHTAL_TOKEN_TTL_HOURS".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_hours,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Validate that a secret is long enough and not an obvious placeholder.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("looks like a placeholder (contains {pattern:?})"),
            ));
        }
    }

    Ok(())
}
