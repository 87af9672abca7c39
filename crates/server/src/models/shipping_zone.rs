//! Shipping zone domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mashtal_core::ShippingZoneId;

/// A shipping zone: a governorate with a flat delivery cost.
///
/// Zones are admin-managed and read-only to the checkout workflow.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingZone {
    /// Unique zone ID.
    pub id: ShippingZoneId,
    /// Governorate name. Unique across zones.
    pub governorate: String,
    /// Flat delivery cost for the governorate.
    pub cost: Decimal,
    /// When the zone was created.
    pub created_at: DateTime<Utc>,
    /// When the zone was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a shipping zone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateZoneInput {
    pub governorate: String,
    pub cost: Decimal,
}

/// Input for updating a shipping zone. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateZoneInput {
    pub governorate: Option<String>,
    pub cost: Option<Decimal>,
}
