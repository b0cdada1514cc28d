//! Themed-party templates

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A themed-event template (birthday, corporate, ...) with a flat fee and
/// a catalog of categories and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyType {
    pub id: Uuid,
    pub name: String,
    /// Event duration in hours (default 4)
    pub duration_hours: Decimal,
    /// Flat fee charged on top of the item total (default 800)
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}
