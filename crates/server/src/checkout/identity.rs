//! Identity resolution: which user does this order belong to?
//!
//! Every order must reference an existing user row. Authenticated checkouts
//! use that user; a stale authenticated id degrades to a freshly created
//! fallback account rather than failing the checkout; guest checkouts
//! always synthesize a throwaway account. Generated placeholder phones are
//! UUID-based, so two guest checkouts never collide on the unique phone
//! column.

use mashtal_core::{Phone, UserRole};

use super::CheckoutError;
use crate::db::{GUEST_PASSWORD_SENTINEL, NO_LOGIN_SENTINEL, NewUser, UserRepository};
use crate::models::user::User;
use crate::services::auth::AuthIdentity;

/// Resolve (or create) the user an order should be attributed to.
///
/// # Errors
///
/// Returns a wrapped repository error if a lookup or insert fails; by
/// construction the returned user always exists in the store.
pub async fn resolve_order_user(
    users: &UserRepository<'_>,
    auth: Option<&AuthIdentity>,
    customer_name: Option<&str>,
) -> Result<User, CheckoutError> {
    let Some(auth) = auth else {
        let user = users
            .create(NewUser {
                name: customer_name.unwrap_or("Guest").to_string(),
                phone: Phone::placeholder("guest"),
                password_hash: GUEST_PASSWORD_SENTINEL.to_string(),
                role: UserRole::User,
            })
            .await?;
        tracing::debug!(user_id = %user.id, "created guest account for checkout");
        return Ok(user);
    };

    if let Some(user) = users.get_by_id(auth.user_id).await? {
        return Ok(user);
    }

    // The token verified but the account is gone (e.g. stale session after
    // a database reset). Recover with a fallback account instead of
    // failing the checkout.
    tracing::warn!(
        user_id = %auth.user_id,
        "authenticated user not found, creating fallback account"
    );
    let user = users
        .create(NewUser {
            name: customer_name.unwrap_or("User").to_string(),
            phone: Phone::placeholder("user"),
            password_hash: NO_LOGIN_SENTINEL.to_string(),
            role: UserRole::User,
        })
        .await?;
    Ok(user)
}
