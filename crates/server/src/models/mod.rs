//! Domain types for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types (which live in [`crate::db`]) and from request/response DTOs (which
//! live next to the route handlers).

pub mod order;
pub mod product;
pub mod shipping_zone;
pub mod stats;
pub mod user;

pub use order::{Order, OrderItem, OrderItemWithProduct, OrderWithItems, OrderWithUser};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use shipping_zone::{CreateZoneInput, ShippingZone, UpdateZoneInput};
pub use stats::{BestSellingProduct, StoreStats};
pub use user::User;
