//! Shipping zone repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use mashtal_core::ShippingZoneId;

use super::{RepositoryError, parse_decimal};
use crate::models::shipping_zone::{CreateZoneInput, ShippingZone, UpdateZoneInput};

/// Internal row type for shipping zone queries.
#[derive(Debug, sqlx::FromRow)]
struct ZoneRow {
    id: i64,
    governorate: String,
    cost: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ZoneRow> for ShippingZone {
    type Error = RepositoryError;

    fn try_from(row: ZoneRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ShippingZoneId::new(row.id),
            governorate: row.governorate,
            cost: parse_decimal("shipping_zones.cost", &row.cost)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for shipping zone database operations.
pub struct ShippingZoneRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShippingZoneRepository<'a> {
    /// Create a new shipping zone repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all zones, ordered by governorate name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, governorate, cost, created_at, updated_at
             FROM shipping_zones
             ORDER BY governorate",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ShippingZone::try_from).collect()
    }

    /// Look up a zone by governorate name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_governorate(
        &self,
        governorate: &str,
    ) -> Result<Option<ShippingZone>, RepositoryError> {
        let row = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, governorate, cost, created_at, updated_at
             FROM shipping_zones
             WHERE governorate = ?",
        )
        .bind(governorate)
        .fetch_optional(self.pool)
        .await?;

        row.map(ShippingZone::try_from).transpose()
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the governorate already has a
    /// zone.
    pub async fn create(&self, input: CreateZoneInput) -> Result<ShippingZone, RepositoryError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO shipping_zones (governorate, cost, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&input.governorate)
        .bind(input.cost.to_string())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "a shipping zone for this governorate already exists")
        })?;

        self.get(ShippingZoneId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get a zone by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShippingZoneId) -> Result<Option<ShippingZone>, RepositoryError> {
        let row = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, governorate, cost, created_at, updated_at
             FROM shipping_zones
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ShippingZone::try_from).transpose()
    }

    /// Update a zone. `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone does not exist, or
    /// `RepositoryError::Conflict` on a governorate collision.
    pub async fn update(
        &self,
        id: ShippingZoneId,
        input: UpdateZoneInput,
    ) -> Result<ShippingZone, RepositoryError> {
        let result = sqlx::query(
            "UPDATE shipping_zones SET
                 governorate = COALESCE(?, governorate),
                 cost = COALESCE(?, cost),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(input.governorate)
        .bind(input.cost.map(|c| c.to_string()))
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "a shipping zone for this governorate already exists")
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone does not exist.
    pub async fn delete(&self, id: ShippingZoneId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shipping_zones WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
