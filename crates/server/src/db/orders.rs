//! Order repository: transactional order assembly and reads.
//!
//! Order creation is one transaction covering the conditional stock
//! decrements and the order/item inserts, so either the whole checkout is
//! visible or none of it is. A failure partway (insufficient stock, dead
//! product reference) rolls everything back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use mashtal_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, Phone, ProductId, UserId};

use super::products::{ProductRepository, StockDecrement};
use super::{RepositoryError, parse_decimal};
use crate::models::order::{Order, OrderItem, OrderItemWithProduct, OrderWithItems, OrderWithUser};
use crate::models::stats::{BestSellingProduct, StoreStats};
use crate::models::user::User;

/// A priced line item ready to persist.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price snapshot, read from the product at pricing time.
    pub unit_price: Decimal,
}

/// A fully assembled order ready to persist.
///
/// All money fields are server-computed by the pricing step; nothing here
/// comes straight from the client.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub governorate: String,
    pub delivery_cost: Decimal,
    pub items: Vec<NewOrderItem>,
}

/// Error type for order creation.
#[derive(Debug, thiserror::Error)]
pub enum CreateOrderError {
    /// A line requested more units than are available.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// A line references a product that no longer exists.
    #[error("product {0} not found")]
    ProductMissing(ProductId),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CreateOrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total_price: String,
    payment_method: PaymentMethod,
    shipping_address: String,
    governorate: String,
    delivery_cost: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_price: parse_decimal("orders.total_price", &row.total_price)?,
            payment_method: row.payment_method,
            shipping_address: row.shipping_address,
            governorate: row.governorate,
            delivery_cost: parse_decimal("orders.delivery_cost", &row.delivery_cost)?,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for order items joined with product details.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    order_id: i64,
    product_id: Option<i64>,
    quantity: i64,
    unit_price: String,
    product_name: Option<String>,
    product_image_url: Option<String>,
}

impl TryFrom<ItemRow> for OrderItemWithProduct {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item: OrderItem {
                id: OrderItemId::new(row.id),
                order_id: OrderId::new(row.order_id),
                product_id: row.product_id.map(ProductId::new),
                quantity: row.quantity,
                unit_price: parse_decimal("order_items.unit_price", &row.unit_price)?,
            },
            product_name: row.product_name,
            product_image_url: row.product_image_url,
        })
    }
}

/// Internal row type for orders joined with their owning user.
#[derive(Debug, sqlx::FromRow)]
struct OrderWithUserRow {
    id: i64,
    user_id: i64,
    total_price: String,
    payment_method: PaymentMethod,
    shipping_address: String,
    governorate: String,
    delivery_cost: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    user_name: String,
    user_phone: String,
    user_role: mashtal_core::UserRole,
    user_created_at: DateTime<Utc>,
}

impl TryFrom<OrderWithUserRow> for (Order, User) {
    type Error = RepositoryError;

    fn try_from(row: OrderWithUserRow) -> Result<Self, RepositoryError> {
        let order = Order {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_price: parse_decimal("orders.total_price", &row.total_price)?,
            payment_method: row.payment_method,
            shipping_address: row.shipping_address,
            governorate: row.governorate,
            delivery_cost: parse_decimal("orders.delivery_cost", &row.delivery_cost)?,
            status: row.status,
            created_at: row.created_at,
        };
        let user = User {
            id: UserId::new(row.user_id),
            name: row.user_name,
            phone: Phone::from_stored(row.user_phone),
            role: row.user_role,
            created_at: row.user_created_at,
        };
        Ok((order, user))
    }
}

/// Internal row type for the best-sellers ranking.
#[derive(Debug, sqlx::FromRow)]
struct BestSellerRow {
    product_id: i64,
    name: String,
    image_url: String,
    total_sold: i64,
}

impl From<BestSellerRow> for BestSellingProduct {
    fn from(row: BestSellerRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            image_url: row.image_url,
            total_sold: row.total_sold,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, total_price, payment_method, shipping_address, \
                             governorate, delivery_cost, status, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist an order and its items, decrementing stock, as one
    /// transaction.
    ///
    /// Each line runs the atomic conditional decrement; the first line that
    /// cannot be satisfied aborts the transaction, so stock is never
    /// consumed without a matching visible order. Two concurrent orders for
    /// the last unit of a product serialize here and exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CreateOrderError::InsufficientStock` or `ProductMissing`
    /// when a line cannot be satisfied, or a wrapped repository error.
    pub async fn create(&self, order: NewOrder) -> Result<OrderWithItems, CreateOrderError> {
        let mut tx = self.pool.begin().await?;

        for item in &order.items {
            match ProductRepository::decrement_stock(&mut *tx, item.product_id, item.quantity)
                .await?
            {
                StockDecrement::Applied => {}
                StockDecrement::Insufficient { available } => {
                    return Err(CreateOrderError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                        available,
                    });
                }
                StockDecrement::Missing => {
                    return Err(CreateOrderError::ProductMissing(item.product_id));
                }
            }
        }

        let now = Utc::now();
        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders
                 (user_id, total_price, payment_method, shipping_address, governorate,
                  delivery_cost, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(order.user_id)
        .bind(order.total_price.to_string())
        .bind(order.payment_method)
        .bind(&order.shipping_address)
        .bind(&order.governorate)
        .bind(order.delivery_cost.to_string())
        .bind(OrderStatus::Pending)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let created = self
            .get_with_items(OrderId::new(order_id))
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(created)
    }

    /// Get an order by ID, without items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Get an order with its items and product details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let Some(order) = self.get(id).await? else {
            return Ok(None);
        };
        let items = self.items_for(id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// List a user's orders with items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order = Order::try_from(row)?;
            let items = self.items_for(order.id).await?;
            orders.push(OrderWithItems { order, items });
        }
        Ok(orders)
    }

    /// List all orders with their users and items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderWithUserRow>(
            "SELECT o.id, o.user_id, o.total_price, o.payment_method, o.shipping_address,
                    o.governorate, o.delivery_cost, o.status, o.created_at,
                    u.name AS user_name, u.phone AS user_phone, u.role AS user_role,
                    u.created_at AS user_created_at
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let (order, user) = row.try_into()?;
            let items = self.items_for(order.id).await?;
            orders.push(OrderWithUser { order, user, items });
        }
        Ok(orders)
    }

    /// Move an order from `from` to `to`, conditionally on it still being
    /// in `from`.
    ///
    /// The caller validates the transition against the status state machine
    /// first; the conditional UPDATE closes the gap against a concurrent
    /// status change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist, or
    /// `RepositoryError::Conflict` if its status changed underneath us.
    pub async fn transition_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return match self.get(id).await? {
                Some(_) => Err(RepositoryError::Conflict(
                    "order status changed concurrently".to_string(),
                )),
                None => Err(RepositoryError::NotFound),
            };
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Compute store-wide aggregates for the admin dashboard.
    ///
    /// Revenue is summed in Rust because order totals are stored as decimal
    /// strings. Best sellers are ranked by lifetime units sold; items whose
    /// product has been deleted drop out of the ranking (their snapshot
    /// still counts toward revenue).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `DataCorruption` if a stored total does not parse.
    pub async fn stats(&self) -> Result<StoreStats, RepositoryError> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        let totals: Vec<String> = sqlx::query_scalar("SELECT total_price FROM orders")
            .fetch_all(self.pool)
            .await?;
        let mut total_revenue = Decimal::ZERO;
        for total in &totals {
            total_revenue += parse_decimal("orders.total_price", total)?;
        }

        let rows = sqlx::query_as::<_, BestSellerRow>(
            "SELECT p.id AS product_id, p.name, p.image_url,
                    SUM(i.quantity) AS total_sold
             FROM order_items i
             JOIN products p ON p.id = i.product_id
             GROUP BY p.id
             ORDER BY total_sold DESC, p.id
             LIMIT 5",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(StoreStats {
            total_users,
            total_orders,
            total_revenue,
            best_selling_products: rows.into_iter().map(BestSellingProduct::from).collect(),
        })
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT i.id, i.order_id, i.product_id, i.quantity, i.unit_price,
                    p.name AS product_name, p.image_url AS product_image_url
             FROM order_items i
             LEFT JOIN products p ON p.id = i.product_id
             WHERE i.order_id = ?
             ORDER BY i.id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItemWithProduct::try_from).collect()
    }
}
