//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness check
//! GET    /health/ready               - Readiness check (pings database)
//!
//! # Auth
//! POST   /api/auth/register          - Create an account, returns token
//! POST   /api/auth/login             - Login with phone + password
//!
//! # Catalog (public reads, admin writes)
//! GET    /api/products               - Product listing
//! GET    /api/products/{id}          - Product detail
//! POST   /api/products               - Create product (admin)
//! PATCH  /api/products/{id}          - Update product (admin)
//! DELETE /api/products/{id}          - Delete product (admin)
//!
//! # Shipping zones
//! GET    /api/shipping-zones         - Zone listing
//! POST   /api/shipping-zones         - Create zone (admin)
//! PATCH  /api/shipping-zones/{id}    - Update zone (admin)
//! DELETE /api/shipping-zones/{id}    - Delete zone (admin)
//!
//! # Orders
//! POST   /api/orders                 - Checkout (guest or authenticated)
//! GET    /api/orders/mine            - Caller's order history
//! GET    /api/orders                 - All orders (admin)
//! PATCH  /api/orders/{id}/status     - Advance order status (admin)
//!
//! # Settings
//! GET    /api/settings               - Store settings
//! PUT    /api/settings               - Replace settings (admin)
//!
//! # Admin dashboard
//! GET    /api/admin/stats            - Store-wide aggregates (admin)
//! ```

pub mod admin;
pub mod auth;
pub mod orders;
pub mod products;
pub mod settings;
pub mod shipping;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create the shipping zone routes router.
pub fn shipping_zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shipping::index).post(shipping::create))
        .route(
            "/{id}",
            axum::routing::patch(shipping::update).delete(shipping::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/mine", get(orders::mine))
        .route("/{id}/status", axum::routing::patch(orders::update_status))
}

/// Create all routes for the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/shipping-zones", shipping_zone_routes())
        .nest("/api/orders", order_routes())
        .route(
            "/api/settings",
            get(settings::show).put(settings::replace),
        )
        .route("/api/admin/stats", get(admin::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
