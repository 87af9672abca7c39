//! End-to-end checkout tests against the real router and an in-memory
//! database.

mod common;

use axum::http::StatusCode;
use mashtal_core::types::UserRole;
use serde_json::json;

use common::{json_decimal, parse_decimal, spawn_app};

#[tokio::test]
async fn guest_checkout_prices_cart_server_side() {
    let t = spawn_app().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Monstera Deliciosa", "100.00", 10).await;

    let (status, body) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [{"product_id": plant.id, "quantity": 2}],
                "governorate": "Cairo",
                "shipping_address": "12 Tahrir Square, Downtown",
                "customer_name": "Nour",
                "customer_phone": "+201234567890"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(json_decimal(&body["total_price"]), parse_decimal("250.00"));
    assert_eq!(json_decimal(&body["delivery_cost"]), parse_decimal("50.00"));
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(
        json_decimal(&body["items"][0]["unit_price"]),
        parse_decimal("100.00")
    );

    // Stock was decremented with the order
    let (_, product) = t.get(&format!("/api/products/{}", plant.id), None).await;
    assert_eq!(product["available_stock"], 8);
}

#[tokio::test]
async fn checkout_rejects_unknown_governorate() {
    let t = spawn_app().await;
    let plant = t.seed_product("Ficus Lyrata", "200.00", 5).await;

    let (status, body) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [{"product_id": plant.id, "quantity": 1}],
                "governorate": "Atlantis",
                "shipping_address": "somewhere"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|m| m.contains("Atlantis")));

    // Nothing was persisted
    let (_, product) = t.get(&format!("/api/products/{}", plant.id), None).await;
    assert_eq!(product["available_stock"], 5);
}

#[tokio::test]
async fn checkout_rejects_missing_product_without_partial_order() {
    let t = spawn_app().await;
    t.seed_zone("Giza", "50.00").await;
    let plant = t.seed_product("Snake Plant", "150.00", 5).await;

    let (status, _) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [
                    {"product_id": plant.id, "quantity": 1},
                    {"product_id": 9999, "quantity": 1}
                ],
                "governorate": "Giza",
                "shipping_address": "somewhere"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    // The valid line must not have consumed stock
    let (_, product) = t.get(&format!("/api/products/{}", plant.id), None).await;
    assert_eq!(product["available_stock"], 5);
}

#[tokio::test]
async fn oversell_is_rejected_and_stock_never_goes_negative() {
    let t = spawn_app().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Last Monstera", "300.00", 1).await;

    let order = json!({
        "items": [{"product_id": plant.id, "quantity": 1}],
        "governorate": "Cairo",
        "shipping_address": "somewhere"
    });

    // Race two checkouts for the last unit; the conditional decrement must
    // let exactly one through no matter how they interleave.
    let ((first, first_body), (second, second_body)) = tokio::join!(
        t.post("/api/orders", None, order.clone()),
        t.post("/api/orders", None, order),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(
        statuses,
        [StatusCode::CREATED, StatusCode::CONFLICT],
        "bodies: {first_body} / {second_body}"
    );

    let (_, product) = t.get(&format!("/api/products/{}", plant.id), None).await;
    assert_eq!(product["available_stock"], 0);
}

#[tokio::test]
async fn checkout_rejects_client_supplied_totals() {
    let t = spawn_app().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Pothos", "80.00", 5).await;

    let (status, _) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [{"product_id": plant.id, "quantity": 1}],
                "governorate": "Cairo",
                "shipping_address": "somewhere",
                "total_price": "0.01"
            }),
        )
        .await;

    assert!(
        status.is_client_error(),
        "unknown fields must be rejected, got {status}"
    );
}

#[tokio::test]
async fn checkout_rejects_empty_cart_and_bad_quantity() {
    let t = spawn_app().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Calathea", "120.00", 5).await;

    let (status, _) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [],
                "governorate": "Cairo",
                "shipping_address": "somewhere"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [{"product_id": plant.id, "quantity": 0}],
                "governorate": "Cairo",
                "shipping_address": "somewhere"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn authenticated_checkout_lands_in_order_history() {
    let t = spawn_app().await;
    t.seed_zone("Alexandria", "75.00").await;
    let plant = t.seed_product("Areca Palm", "250.00", 3).await;

    let user = t.seed_user("Salma", "+201112223334", UserRole::User).await;
    let token = t.state.auth().issue_token(&user).expect("token");

    let (status, body) = t
        .post(
            "/api/orders",
            Some(&token),
            json!({
                "items": [{"product_id": plant.id, "quantity": 1}],
                "governorate": "Alexandria",
                "shipping_address": "5 Corniche Road"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["user_id"], user.id.as_i64());

    let (status, mine) = t.get("/api/orders/mine", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(json_decimal(&mine[0]["total_price"]), parse_decimal("325.00"));
}

#[tokio::test]
async fn guest_checkouts_create_distinct_accounts() {
    let t = spawn_app().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Spider Plant", "60.00", 10).await;

    let order = json!({
        "items": [{"product_id": plant.id, "quantity": 1}],
        "governorate": "Cairo",
        "shipping_address": "somewhere",
        "customer_name": "Walk-in"
    });

    let (_, first) = t.post("/api/orders", None, order.clone()).await;
    let (_, second) = t.post("/api/orders", None, order).await;

    assert_ne!(
        first["user_id"], second["user_id"],
        "each guest order gets its own account"
    );
}
