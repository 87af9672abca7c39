//! Authentication service.
//!
//! Phone + password accounts with argon2 hashing, and stateless JWT bearer
//! tokens carrying the verified `(user id, role)` pair that the rest of the
//! system consumes. Token mechanics stay inside this module; handlers only
//! see [`AuthIdentity`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use mashtal_core::{Phone, UserId, UserRole};

use crate::db::{NewUser, RepositoryError, UserRepository};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum display name length.
const MIN_NAME_LENGTH: usize = 2;

/// A verified identity extracted from a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthIdentity {
    pub user_id: UserId,
    pub role: UserRole,
}

impl AuthIdentity {
    /// Whether this identity has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID.
    sub: i64,
    /// Account role.
    role: UserRole,
    /// Expiry (unix seconds).
    exp: i64,
    /// Issued at (unix seconds).
    iat: i64,
}

/// Authentication service.
///
/// Handles registration, login, and token issue/verification.
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: chrono::Duration,
}

impl AuthService {
    /// Create a new authentication service from the signing secret.
    #[must_use]
    pub fn new(jwt_secret: &SecretString, token_ttl_hours: i64) -> Self {
        let secret = jwt_secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl: chrono::Duration::hours(token_ttl_hours),
        }
    }

    /// Register a new account with name, phone, and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone`/`InvalidName`/`WeakPassword` on
    /// validation failures, or `UserAlreadyExists` if the phone is taken.
    pub async fn register(
        &self,
        pool: &SqlitePool,
        name: &str,
        phone: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let phone = Phone::parse(phone)?;
        let name = name.trim();
        if name.len() < MIN_NAME_LENGTH {
            return Err(AuthError::InvalidName(format!(
                "name must be at least {MIN_NAME_LENGTH} characters"
            )));
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = UserRepository::new(pool)
            .create(NewUser {
                name: name.to_string(),
                phone,
                password_hash,
                role: UserRole::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Login with phone and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the phone/password is
    /// wrong. Accounts holding a non-login sentinel (guest/fallback rows)
    /// can never log in.
    pub async fn login(
        &self,
        pool: &SqlitePool,
        phone: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let phone = Phone::parse(phone)?;

        let credentials = UserRepository::new(pool)
            .get_credentials_by_phone(&phone)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        let token = self.issue_token(&credentials.user)?;
        Ok((credentials.user, token))
    }

    /// Issue a signed bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.as_i64(),
            role: user.role,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a bearer token and extract the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed,
    /// tampered with, or expired.
    pub fn verify_token(&self, token: &str) -> Result<AuthIdentity, AuthError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
                .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthIdentity {
            user_id: UserId::new(data.claims.sub),
            role: data.claims.role,
        })
    }
}

/// Validate password strength.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// The non-login sentinels stored for guest/fallback accounts are not valid
/// argon2 hashes and therefore always fail verification, which is exactly
/// the behavior those accounts need.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn test_user(role: UserRole) -> User {
        User {
            id: UserId::new(7),
            name: "Mona".to_string(),
            phone: Phone::parse("01001234567").expect("valid phone"),
            role,
            created_at: Utc::now(),
        }
    }

    fn service() -> AuthService {
        AuthService::new(&SecretString::from("a".repeat(64)), 24)
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hashing succeeds");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_sentinels_never_verify() {
        for sentinel in [crate::db::GUEST_PASSWORD_SENTINEL, crate::db::NO_LOGIN_SENTINEL] {
            assert!(matches!(
                verify_password(sentinel, sentinel),
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn test_token_roundtrip_carries_identity() {
        let service = service();
        let user = test_user(UserRole::Admin);

        let token = service.issue_token(&user).expect("token issued");
        let identity = service.verify_token(&token).expect("token verifies");

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, UserRole::Admin);
        assert!(identity.is_admin());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let other = AuthService::new(&SecretString::from("b".repeat(64)), 24);
        let token = other
            .issue_token(&test_user(UserRole::User))
            .expect("token issued");

        assert!(matches!(
            service.verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            service.verify_token("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough password").is_ok());
    }
}
