//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use mashtal_core::ProductId;

use super::{RepositoryError, parse_decimal};
use crate::models::product::{CreateProductInput, Product, UpdateProductInput};

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was sufficient and has been decremented.
    Applied,
    /// Stock was insufficient; nothing was changed.
    Insufficient {
        /// Units actually available at the time of the check.
        available: i64,
    },
    /// The product does not exist.
    Missing,
}

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    description: String,
    price: String,
    weight: String,
    available_stock: i64,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            category: row.category,
            description: row.description,
            price: parse_decimal("products.price", &row.price)?,
            weight: parse_decimal("products.weight", &row.weight)?,
            available_stock: row.available_stock,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, category, description, price, weight, available_stock, image_url,
                    created_at, updated_at
             FROM products
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, category, description, price, weight, available_stock, image_url,
                    created_at, updated_at
             FROM products
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO products
                 (name, category, description, price, weight, available_stock, image_url,
                  created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.price.to_string())
        .bind(input.weight.to_string())
        .bind(input.available_stock)
        .bind(&input.image_url)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        self.get(ProductId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a product. `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET
                 name = COALESCE(?, name),
                 category = COALESCE(?, category),
                 description = COALESCE(?, description),
                 price = COALESCE(?, price),
                 weight = COALESCE(?, weight),
                 available_stock = COALESCE(?, available_stock),
                 image_url = COALESCE(?, image_url),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(input.name)
        .bind(input.category)
        .bind(input.description)
        .bind(input.price.map(|p| p.to_string()))
        .bind(input.weight.map(|w| w.to_string()))
        .bind(input.available_stock)
        .bind(input.image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Historical order items keep their snapshot of the product's price;
    /// only the live catalog entry goes away.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Atomically decrement a product's stock if enough is available.
    ///
    /// This is the only mutation contended by concurrent checkouts, so it is
    /// a single conditional UPDATE: either the row has enough stock and the
    /// decrement applies, or nothing changes. Runs on a transaction's
    /// connection so it commits or rolls back together with the order
    /// insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: ProductId,
        quantity: i64,
    ) -> Result<StockDecrement, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products
             SET available_stock = available_stock - ?, updated_at = ?
             WHERE id = ? AND available_stock >= ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(StockDecrement::Applied);
        }

        // Distinguish "not enough stock" from "no such product".
        let available: Option<i64> =
            sqlx::query_scalar("SELECT available_stock FROM products WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(available.map_or(StockDecrement::Missing, |available| {
            StockDecrement::Insufficient { available }
        }))
    }
}
