//! Store settings database operations.
//!
//! A small key-value record for store-wide configuration (store name,
//! contact phone, mobile-wallet number). Owned by the backend and edited
//! through the admin settings endpoint; values are arbitrary JSON.

use chrono::Utc;
use serde_json::{Map, Value as JsonValue};
use sqlx::SqlitePool;

use super::RepositoryError;

/// Repository for store settings.
pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all settings as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value is not valid JSON.
    pub async fn get_all(&self) -> Result<Map<String, JsonValue>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM settings ORDER BY key",
        )
        .fetch_all(self.pool)
        .await?;

        let mut map = Map::new();
        for (key, raw) in rows {
            let value = serde_json::from_str(&raw).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid JSON in settings.{key}: {e}"))
            })?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Get a single setting value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored value is not valid JSON.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool)
            .await?;

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid JSON in settings.{key}: {e}"))
            })
        })
        .transpose()
    }

    /// Upsert a single setting value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value,
                                             updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value.to_string())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Upsert a batch of settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn set_all(&self, values: &Map<String, JsonValue>) -> Result<(), RepositoryError> {
        for (key, value) in values {
            self.set(key, value).await?;
        }
        Ok(())
    }
}
