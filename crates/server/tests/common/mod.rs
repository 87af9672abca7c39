#![allow(dead_code)] // not every test binary uses every helper

//! Shared harness for API integration tests.
//!
//! Serves the real router against an in-memory `SQLite` database. The pool
//! is capped at a single connection so every query sees the same
//! `:memory:` database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use mashtal_core::types::{Phone, UserRole};
use mashtal_server::config::ServerConfig;
use mashtal_server::db::{self, NewUser, UserRepository};
use mashtal_server::models::{CreateProductInput, CreateZoneInput, Product, ShippingZone, User};
use mashtal_server::routes;
use mashtal_server::services::auth::hash_password;
use mashtal_server::state::AppState;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
        token_ttl_hours: 1,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Spin up a migrated in-memory database and build the router over it.
pub async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    db::MIGRATOR.run(&pool).await.expect("migrations failed");

    let state = AppState::new(test_config(), pool.clone());
    TestApp {
        app: routes::router(state.clone()),
        pool,
        state,
    }
}

impl TestApp {
    /// Send a request and return its status plus parsed JSON body (or
    /// `Value::Null` for empty bodies).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    /// Insert an admin account directly and mint a token for it.
    pub async fn seed_admin(&self) -> String {
        let user = self.seed_user("Admin", "+201000000001", UserRole::Admin).await;
        self.state.auth().issue_token(&user).expect("token issue failed")
    }

    pub async fn seed_user(&self, name: &str, phone: &str, role: UserRole) -> User {
        UserRepository::new(&self.pool)
            .create(NewUser {
                name: name.to_string(),
                phone: Phone::parse(phone).expect("valid phone"),
                password_hash: hash_password("correct horse battery").expect("hash failed"),
                role,
            })
            .await
            .expect("user insert failed")
    }

    pub async fn seed_product(&self, name: &str, price: &str, stock: i64) -> Product {
        db::ProductRepository::new(&self.pool)
            .create(CreateProductInput {
                name: name.to_string(),
                category: "indoor".to_string(),
                description: format!("{name} in a 20cm pot"),
                price: parse_decimal(price),
                weight: parse_decimal("1.5"),
                available_stock: stock,
                image_url: "/images/placeholder.webp".to_string(),
            })
            .await
            .expect("product insert failed")
    }

    pub async fn seed_zone(&self, governorate: &str, cost: &str) -> ShippingZone {
        db::ShippingZoneRepository::new(&self.pool)
            .create(CreateZoneInput {
                governorate: governorate.to_string(),
                cost: parse_decimal(cost),
            })
            .await
            .expect("zone insert failed")
    }
}

pub fn parse_decimal(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

/// Parse a decimal out of a JSON string field.
pub fn json_decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("expected decimal string")
        .parse()
        .expect("valid decimal in response")
}
