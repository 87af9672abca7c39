//! Registration, login, and access-control tests.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn register_then_login_roundtrip() {
    let t = spawn_app().await;

    let (status, body) = t
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Salma",
                "phone": "+201234567890",
                "password": "a-long-enough-password"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Salma");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = t
        .post(
            "/api/auth/login",
            None,
            json!({"phone": "+201234567890", "password": "a-long-enough-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The issued token is accepted by an authenticated endpoint
    let token = body["token"].as_str().expect("token").to_string();
    let (status, _) = t.get("/api/orders/mine", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_duplicate_phone() {
    let t = spawn_app().await;

    let body = json!({
        "name": "Salma",
        "phone": "+201234567890",
        "password": "a-long-enough-password"
    });

    let (first, _) = t.post("/api/auth/register", None, body.clone()).await;
    let (second, _) = t.post("/api/auth/register", None, body).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_validates_input() {
    let t = spawn_app().await;

    // Weak password
    let (status, _) = t
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Salma", "phone": "+201234567890", "password": "short"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Bad phone
    let (status, _) = t
        .post(
            "/api/auth/register",
            None,
            json!({"name": "Salma", "phone": "not-a-phone", "password": "a-long-enough-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let t = spawn_app().await;

    t.post(
        "/api/auth/register",
        None,
        json!({
            "name": "Salma",
            "phone": "+201234567890",
            "password": "a-long-enough-password"
        }),
    )
    .await;

    let (status, _) = t
        .post(
            "/api/auth/login",
            None,
            json!({"phone": "+201234567890", "password": "wrong-password-entirely"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_endpoints_require_a_token() {
    let t = spawn_app().await;

    let (status, _) = t.get("/api/orders/mine", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.get("/api/orders/mine", Some("garbage.token.here")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_endpoints_reject_regular_users() {
    let t = spawn_app().await;

    let (_, body) = t
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Salma",
                "phone": "+201234567890",
                "password": "a-long-enough-password"
            }),
        )
        .await;
    let token = body["token"].as_str().expect("token").to_string();

    let (status, _) = t.get("/api/orders", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .post(
            "/api/products",
            Some(&token),
            json!({
                "name": "Fern",
                "category": "indoor",
                "description": "a fern",
                "price": "90.00",
                "weight": "1.0",
                "available_stock": 3,
                "image_url": "/images/fern.webp"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
