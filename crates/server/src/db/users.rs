//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use mashtal_core::{Phone, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::User;

/// Password sentinel for accounts synthesized on guest checkout.
///
/// Not a valid argon2 hash, so no password ever verifies against it.
pub const GUEST_PASSWORD_SENTINEL: &str = "guest-no-login";

/// Password sentinel for fallback accounts created when an authenticated
/// session points at a user row that no longer exists.
pub const NO_LOGIN_SENTINEL: &str = "no-login";

/// Input for creating a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: Phone,
    /// Argon2 hash, or one of the non-login sentinels.
    pub password_hash: String,
    pub role: UserRole,
}

/// A user together with their stored password hash, for login verification.
///
/// The hash stays inside the auth service; everything else works with
/// [`User`].
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    phone: String,
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserCredentials {
    fn from(row: UserRow) -> Self {
        Self {
            user: User {
                id: UserId::new(row.id),
                name: row.name,
                phone: Phone::from_stored(row.phone),
                role: row.role,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone, password_hash, role, created_at
             FROM users
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| UserCredentials::from(r).user))
    }

    /// Get a user with their password hash by phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone, password_hash, role, created_at
             FROM users
             WHERE phone = ?",
        )
        .bind(phone.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserCredentials::from))
    }

    /// Create a user row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone number is already
    /// registered.
    pub async fn create(&self, input: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, phone, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.phone.as_str())
        .bind(&input.password_hash)
        .bind(input.role)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "phone number already registered"))?;

        Ok(User {
            id: UserId::new(id),
            name: input.name,
            phone: input.phone,
            role: input.role,
            created_at: now,
        })
    }
}
