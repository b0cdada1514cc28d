//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Reference to a catalog item as sent by clients.
///
/// Legacy installations address variants either by an opaque external
/// document id (string) or by an older numeric id, and requests may mix
/// both in the same basket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Internal(i64),
    External(String),
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Internal(id) => write!(f, "{}", id),
            ItemRef::External(id) => write!(f, "{}", id),
        }
    }
}

/// A requested basket line: an item reference plus the quantity the
/// customer asked for (defaults to 1 when omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    pub id: ItemRef,
    pub quantity: Option<i32>,
}

impl RequestedItem {
    pub fn quantity_or_default(&self) -> i32 {
        self.quantity.unwrap_or(1).max(0)
    }
}

/// A direct-order line as submitted by the client: reference, display
/// title, price and quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedOrderItem {
    pub id: ItemRef,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Collapse basket lines that repeat the same reference into one line
/// with the summed quantity. The first line's title and price win;
/// first-seen order is preserved. Persisted lines are unique per
/// reference, so duplicates must be merged before they reach the store.
pub fn merge_duplicate_items(items: Vec<DetailedOrderItem>) -> Vec<DetailedOrderItem> {
    let mut merged: Vec<DetailedOrderItem> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(existing) = merged.iter_mut().find(|m| m.id == item.id) {
            existing.quantity = existing.quantity.max(0) + item.quantity.max(0);
        } else {
            merged.push(item);
        }
    }
    merged
}

/// Customer contact fields attached to a budget/order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Deserialize an edit field that distinguishes "absent" (leave the
/// stored value alone) from explicit `null` (clear it). Use together
/// with `#[serde(default)]`: an absent field stays `None`, `null`
/// becomes `Some(None)`, a value becomes `Some(Some(value))`.
pub fn deserialize_patch<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
