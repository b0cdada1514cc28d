//! Cost rollups: read-time profit figures with estimation fallbacks
//!
//! Both computations are fail-safe: an internal error degrades to a
//! best-effort value plus a warning log, never an error to the caller,
//! so a dashboard or quote view always renders.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::CatalogService;
use shared::{
    fallback_unit_cost, total_cost_price, DetailedOrderItem, ItemCostInput, RequestedItem,
};

/// Cost rollup service
#[derive(Clone)]
pub struct CostService {
    db: PgPool,
}

/// Per-reference unit costs plus the aggregate, computed before order
/// items exist
#[derive(Debug, Clone, Serialize)]
pub struct CostMap {
    pub unit_costs: HashMap<String, Decimal>,
    pub total_cost: Decimal,
}

/// Database row joining an order item with its variant's cost price
#[derive(Debug, sqlx::FromRow)]
struct ItemCostRow {
    quantity: i32,
    unit_price: Decimal,
    unit_cost: Option<Decimal>,
    total_item_price: Decimal,
    variant_cost_price: Option<Decimal>,
}

impl CostService {
    /// Create a new CostService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Total cost of an order, recomputed from item-level data on every
    /// read. The stored order-level total is never trusted. Returns zero
    /// (with a warning) if anything goes wrong internally.
    pub async fn total_cost_price(&self, order_id: Uuid) -> Decimal {
        match self.load_item_costs(order_id).await {
            Ok(items) => total_cost_price(&items),
            Err(e) => {
                tracing::warn!(order_id = %order_id,
                    "cost rollup failed, returning 0: {}", e);
                Decimal::ZERO
            }
        }
    }

    async fn load_item_costs(&self, order_id: Uuid) -> AppResult<Vec<ItemCostInput>> {
        let rows = sqlx::query_as::<_, ItemCostRow>(
            r#"
            SELECT i.quantity, i.unit_price, i.unit_cost, i.total_item_price,
                   v.cost_price AS variant_cost_price
            FROM order_items i
            LEFT JOIN product_variants v ON v.id = i.variant_id
            WHERE i.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ItemCostInput {
                quantity: row.quantity,
                unit_price: row.unit_price,
                unit_cost: row.unit_cost,
                variant_cost_price: row.variant_cost_price,
                total_item_price: Some(row.total_item_price),
            })
            .collect())
    }

    /// Per-item unit costs for a direct order, resolved from the catalog
    /// before the order items exist. Variants without an authoritative
    /// cost price are estimated at half their price; references that
    /// cannot be resolved at all fall back to half the submitted price.
    pub async fn cost_map(&self, items: &[DetailedOrderItem]) -> CostMap {
        match self.resolve_cost_map(items).await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("cost map resolution failed, estimating from request prices: {}", e);
                Self::estimated_cost_map(items)
            }
        }
    }

    async fn resolve_cost_map(&self, items: &[DetailedOrderItem]) -> AppResult<CostMap> {
        let requested: Vec<RequestedItem> = items
            .iter()
            .map(|item| RequestedItem {
                id: item.id.clone(),
                quantity: Some(item.quantity),
            })
            .collect();

        let catalog = CatalogService::new(self.db.clone());
        let resolved = catalog.resolve_items(&requested).await?;

        let resolved_costs: HashMap<String, Decimal> = resolved
            .iter()
            .map(|item| {
                let unit_cost = item
                    .cost_price
                    .unwrap_or_else(|| fallback_unit_cost(item.price));
                (item.reference.to_string(), unit_cost)
            })
            .collect();

        let mut unit_costs = HashMap::new();
        let mut total_cost = Decimal::ZERO;
        for item in items {
            let key = item.id.to_string();
            let unit_cost = resolved_costs
                .get(&key)
                .copied()
                .unwrap_or_else(|| fallback_unit_cost(item.price));
            total_cost += unit_cost * Decimal::from(item.quantity.max(0) as i64);
            unit_costs.insert(key, unit_cost);
        }

        Ok(CostMap {
            unit_costs,
            total_cost: total_cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        })
    }

    /// Degraded map built entirely from submitted prices
    fn estimated_cost_map(items: &[DetailedOrderItem]) -> CostMap {
        let mut unit_costs = HashMap::new();
        let mut total_cost = Decimal::ZERO;
        for item in items {
            let unit_cost = fallback_unit_cost(item.price);
            total_cost += unit_cost * Decimal::from(item.quantity.max(0) as i64);
            unit_costs.insert(item.id.to_string(), unit_cost);
        }
        CostMap {
            unit_costs,
            total_cost: total_cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}
