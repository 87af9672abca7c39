//! Admin surface tests: catalog management, shipping zones, fulfilment,
//! and store settings.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{json_decimal, parse_decimal, spawn_app};

#[tokio::test]
async fn product_crud_lifecycle() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;

    let (status, created) = t
        .post(
            "/api/products",
            Some(&admin),
            json!({
                "name": "Monstera Deliciosa",
                "category": "indoor",
                "description": "Large split-leaf monstera",
                "price": "350.00",
                "weight": "2.5",
                "available_stock": 12,
                "image_url": "/images/monstera.webp"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {created}");
    let id = created["id"].as_i64().expect("id");

    // Public read
    let (status, fetched) = t.get(&format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Monstera Deliciosa");
    assert_eq!(json_decimal(&fetched["price"]), parse_decimal("350.00"));

    // Partial update leaves other fields alone
    let (status, updated) = t
        .request(
            "PATCH",
            &format!("/api/products/{id}"),
            Some(&admin),
            Some(json!({"price": "299.00"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_decimal(&updated["price"]), parse_decimal("299.00"));
    assert_eq!(updated["available_stock"], 12);

    // Delete, then 404
    let (status, _) = t
        .request("DELETE", &format!("/api/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.get(&format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shipping_zone_governorates_are_unique() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;

    let zone = json!({"governorate": "Cairo", "cost": "50.00"});
    let (first, _) = t.post("/api/shipping-zones", Some(&admin), zone.clone()).await;
    let (second, _) = t.post("/api/shipping-zones", Some(&admin), zone).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);

    // The listing is public
    let (status, zones) = t.get("/api/shipping-zones", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zones.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn order_status_moves_one_step_at_a_time() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Rubber Plant", "180.00", 5).await;

    let (_, order) = t
        .post(
            "/api/orders",
            None,
            json!({
                "items": [{"product_id": plant.id, "quantity": 1}],
                "governorate": "Cairo",
                "shipping_address": "somewhere"
            }),
        )
        .await;
    let id = order["id"].as_i64().expect("order id");
    let status_uri = format!("/api/orders/{id}/status");

    // Skipping a step is rejected
    let (status, _) = t
        .request(
            "PATCH",
            &status_uri,
            Some(&admin),
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Walking the sequence works
    for next in ["processing", "shipped", "delivered"] {
        let (status, body) = t
            .request(
                "PATCH",
                &status_uri,
                Some(&admin),
                Some(json!({"status": next})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "moving to {next}: {body}");
        assert_eq!(body["status"], next);
    }

    // Delivered is terminal
    let (status, _) = t
        .request(
            "PATCH",
            &status_uri,
            Some(&admin),
            Some(json!({"status": "pending"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_order_listing_includes_customer() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;
    t.seed_zone("Cairo", "50.00").await;
    let plant = t.seed_product("Peace Lily", "140.00", 5).await;

    t.post(
        "/api/orders",
        None,
        json!({
            "items": [{"product_id": plant.id, "quantity": 1}],
            "governorate": "Cairo",
            "shipping_address": "somewhere",
            "customer_name": "Walk-in"
        }),
    )
    .await;

    let (status, orders) = t.get("/api/orders", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    assert!(orders[0]["user"]["name"].as_str().is_some());
    assert_eq!(orders[0]["items"][0]["product_name"], "Peace Lily");
}

#[tokio::test]
async fn dashboard_stats_aggregate_users_orders_and_revenue() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;
    t.seed_zone("Cairo", "50.00").await;
    let rubber = t.seed_product("Rubber Plant", "180.00", 10).await;
    let lily = t.seed_product("Peace Lily", "140.00", 10).await;

    // Two guest orders: 410.00 (2x180 + 50) and 370.00 (180 + 140 + 50).
    t.post(
        "/api/orders",
        None,
        json!({
            "items": [{"product_id": rubber.id, "quantity": 2}],
            "governorate": "Cairo",
            "shipping_address": "somewhere"
        }),
    )
    .await;
    t.post(
        "/api/orders",
        None,
        json!({
            "items": [
                {"product_id": rubber.id, "quantity": 1},
                {"product_id": lily.id, "quantity": 1}
            ],
            "governorate": "Cairo",
            "shipping_address": "elsewhere"
        }),
    )
    .await;

    let (status, stats) = t.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "body: {stats}");

    // Admin plus the two synthesized guest accounts.
    assert_eq!(stats["total_users"], 3);
    assert_eq!(stats["total_orders"], 2);
    assert_eq!(json_decimal(&stats["total_revenue"]), parse_decimal("780.00"));

    let best = stats["best_selling_products"].as_array().expect("array");
    assert_eq!(best.len(), 2);
    assert_eq!(best[0]["name"], "Rubber Plant");
    assert_eq!(best[0]["total_sold"], 3);
    assert_eq!(best[1]["name"], "Peace Lily");
    assert_eq!(best[1]["total_sold"], 1);

    // The dashboard is admin-only.
    let (status, _) = t.get("/api/admin/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn settings_roundtrip() {
    let t = spawn_app().await;
    let admin = t.seed_admin().await;

    let (status, body) = t
        .request(
            "PUT",
            "/api/settings",
            Some(&admin),
            Some(json!({"store_name": "Mashtal", "support_phone": "+20100000000"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    // Public read sees the stored values
    let (status, settings) = t.get("/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["store_name"], "Mashtal");

    // Writes require admin
    let (status, _) = t
        .request("PUT", "/api/settings", None, Some(json!({"x": 1})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
