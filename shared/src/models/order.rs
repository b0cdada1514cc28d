//! Budgets, orders, order items and the fulfillment status machine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fulfillment pipeline status of a budget/order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendente,
    Confirmado,
    EmProducao,
    Pronto,
    Entregue,
    Cancelado,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendente => "pendente",
            OrderStatus::Confirmado => "confirmado",
            OrderStatus::EmProducao => "em_producao",
            OrderStatus::Pronto => "pronto",
            OrderStatus::Entregue => "entregue",
            OrderStatus::Cancelado => "cancelado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(OrderStatus::Pendente),
            "confirmado" => Some(OrderStatus::Confirmado),
            "em_producao" => Some(OrderStatus::EmProducao),
            "pronto" => Some(OrderStatus::Pronto),
            "entregue" => Some(OrderStatus::Entregue),
            "cancelado" => Some(OrderStatus::Cancelado),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected status transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
    #[error("an event date is required before an order can be marked pronto")]
    EventDateRequired,
}

impl OrderStatus {
    /// Validate a status transition.
    ///
    /// The pipeline is `pendente -> confirmado -> em_producao -> pronto ->
    /// entregue`, with `cancelado` reachable from `pendente` or
    /// `confirmado`. Marking an order `pronto` requires its event date to
    /// be set; the check lives here so every caller gets it.
    pub fn validate_transition(
        self,
        to: OrderStatus,
        has_event_date: bool,
    ) -> Result<(), TransitionError> {
        use OrderStatus::*;

        let allowed = matches!(
            (self, to),
            (Pendente, Confirmado)
                | (Pendente, Cancelado)
                | (Confirmado, EmProducao)
                | (Confirmado, Cancelado)
                | (EmProducao, Pronto)
                | (Pronto, Entregue)
        );
        if !allowed {
            return Err(TransitionError::NotAllowed { from: self, to });
        }
        if to == Pronto && !has_event_date {
            return Err(TransitionError::EventDateRequired);
        }
        Ok(())
    }
}

/// The central budget/order record.
///
/// A non-null `party_type_id` marks a themed "festa" (which reserves its
/// event date exclusively among festas); a null one marks a direct
/// "encomenda", which never blocks a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub party_type_id: Option<Uuid>,
    pub status: OrderStatus,
    pub event_date: Option<DateTime<Utc>>,
    pub number_of_people: i32,
    pub total_price: Decimal,
    /// Derived field: reads recompute this from item-level data every
    /// time. The stored value is a best-effort snapshot and is never
    /// trusted as authoritative.
    pub total_cost_price: Decimal,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether this is a themed-party order ("festa")
    pub fn is_festa(&self) -> bool {
        self.party_type_id.is_some()
    }
}

/// One line of an order, linked to a product variant.
///
/// `total_item_price` equals `unit_price * quantity` at write time; it can
/// drift if `quantity` is later edited without recomputation, which is why
/// cost rollups prefer it only as a fallback input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Linked variant; direct-order lines keep their caller-supplied
    /// title even when the reference could not be linked to the catalog
    pub variant_id: Option<Uuid>,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub unit_cost: Option<Decimal>,
    pub total_item_price: Decimal,
}

/// Append-only audit entry attached to an order. The engine only writes
/// these; it never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub id: Uuid,
    pub order_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
