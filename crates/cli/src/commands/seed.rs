//! Seed the database with shipping zones and a starter catalog.
//!
//! Idempotent: rows that already exist (by governorate or product name)
//! are left alone, so the command can run against a live database.
//!
//! # Environment Variables
//!
//! - `MASHTAL_DATABASE_URL` - `SQLite` connection string
//!   (default: sqlite://mashtal.db)

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

use mashtal_server::db::{self, ProductRepository, RepositoryError, ShippingZoneRepository};
use mashtal_server::models::{CreateProductInput, CreateZoneInput};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// A seed literal failed to parse.
    #[error("Invalid seed value: {0}")]
    BadValue(String),
}

/// Governorate name and delivery cost pairs.
const ZONES: &[(&str, &str)] = &[("Cairo", "50.00"), ("Giza", "50.00"), ("Alexandria", "75.00")];

/// Starter catalog: name, category, description, price, weight kg, stock.
const PRODUCTS: &[(&str, &str, &str, &str, &str, i64)] = &[
    (
        "Monstera Deliciosa",
        "indoor",
        "Split-leaf monstera in a 24cm pot",
        "350.00",
        "2.50",
        12,
    ),
    (
        "Snake Plant",
        "indoor",
        "Low-maintenance sansevieria, tolerates shade",
        "150.00",
        "1.20",
        20,
    ),
    (
        "Areca Palm",
        "indoor",
        "Air-purifying palm, around 80cm tall",
        "250.00",
        "3.00",
        8,
    ),
    (
        "Jasmine",
        "outdoor",
        "Fragrant climbing jasmine for balconies",
        "90.00",
        "1.00",
        25,
    ),
    (
        "Lemon Tree",
        "fruit",
        "Grafted baladi lemon, fruits within two seasons",
        "420.00",
        "5.00",
        6,
    ),
];

/// Insert the starter zones and products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails for
/// a reason other than the row already existing.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MASHTAL_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://mashtal.db".to_string());

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    seed_zones(&pool).await?;
    seed_products(&pool).await?;

    tracing::info!("Seed complete!");
    Ok(())
}

async fn seed_zones(pool: &SqlitePool) -> Result<(), SeedError> {
    let zones = ShippingZoneRepository::new(pool);
    for (governorate, cost) in ZONES {
        match zones
            .create(CreateZoneInput {
                governorate: (*governorate).to_string(),
                cost: parse(cost)?,
            })
            .await
        {
            Ok(zone) => tracing::info!("Seeded shipping zone {} ({})", zone.governorate, zone.cost),
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!("Shipping zone {governorate} already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn seed_products(pool: &SqlitePool) -> Result<(), SeedError> {
    let existing: Vec<String> = ProductRepository::new(pool)
        .list()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let products = ProductRepository::new(pool);
    for (name, category, description, price, weight, stock) in PRODUCTS {
        if existing.iter().any(|n| n == name) {
            tracing::info!("Product {name} already exists, skipping");
            continue;
        }
        let product = products
            .create(CreateProductInput {
                name: (*name).to_string(),
                category: (*category).to_string(),
                description: (*description).to_string(),
                price: parse(price)?,
                weight: parse(weight)?,
                available_stock: *stock,
                image_url: format!("/images/{}.webp", slug(name)),
            })
            .await?;
        tracing::info!("Seeded product {} ({})", product.name, product.price);
    }
    Ok(())
}

fn parse(value: &str) -> Result<Decimal, SeedError> {
    value
        .parse()
        .map_err(|_| SeedError::BadValue(value.to_string()))
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
