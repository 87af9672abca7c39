//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mashtal_core::{Phone, UserId, UserRole};

/// A storefront account (domain type).
///
/// Covers three kinds of rows: registered customers, admins, and the
/// throwaway accounts synthesized for guest checkouts. The password hash
/// never leaves the repository layer; login goes through
/// [`crate::db::UserRepository::get_credentials_by_phone`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Phone number (login handle), or a generated placeholder for
    /// synthesized accounts.
    pub phone: Phone,
    /// Account role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
