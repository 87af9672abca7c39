//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Orders move through a fixed pipeline:
///
/// ```text
/// pending -> processing -> shipped -> delivered
/// ```
///
/// Transitions are monotonic and one step at a time; `delivered` is
/// terminal. Status updates that skip a state or move backwards are
/// rejected by [`OrderStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order accepted, awaiting admin confirmation.
    #[default]
    Pending,
    /// Order confirmed and being prepared.
    Processing,
    /// Order handed to the courier.
    Shipped,
    /// Order received by the customer. Terminal.
    Delivered,
}

impl OrderStatus {
    /// The next status in the pipeline, or `None` if terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Only the immediate successor is allowed; regressions and skips are
    /// not.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay the courier on delivery.
    #[default]
    Cash,
    /// Mobile wallet transfer to the store's wallet number.
    Wallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Wallet => write!(f, "wallet"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "wallet" => Ok(Self::Wallet),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Account role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular customer account (includes synthesized guest accounts).
    #[default]
    User,
    /// Store administrator: manages the catalog, zones, orders, settings.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
