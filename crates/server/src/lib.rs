//! Mashtal server - JSON API backend for the plant nursery storefront.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - `SQLite` via sqlx for all persistence
//! - Stateless bearer-token authentication (phone + password accounts)
//! - Checkout workflow that prices carts server-side and decrements
//!   stock atomically with order persistence
//!
//! The binary lives in `main.rs`; everything else is exposed as a library
//! so integration tests can build the router against an in-memory
//! database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
