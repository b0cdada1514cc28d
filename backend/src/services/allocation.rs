//! Order-item allocation: materializing concrete quantities for a
//! themed-party order
//!
//! Uses the same grouping and per-guest allowance rule as the pricing
//! engine, but produces integral quantities. Rows are computed up front
//! and persisted as a best-effort batch: bounded concurrency, per-row
//! error capture, no rollback of siblings that already succeeded.

use futures::{stream, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{computed_quantity, fallback_unit_cost, group_sizes, ResolvedItem};

/// Writes in flight at once; keeps a big basket from flooding the pool
const WRITE_CONCURRENCY: usize = 8;

/// Allocation service for persisting order items
#[derive(Clone)]
pub struct AllocationService {
    db: PgPool,
}

/// Outcome of a best-effort allocation batch
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AllocationOutcome {
    pub created: usize,
    pub failed: usize,
}

/// A row ready to persist
#[derive(Debug, Clone)]
struct PlannedItem {
    variant_id: Uuid,
    title: String,
    quantity: i32,
}

impl AllocationService {
    /// Create a new AllocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist one order-item row per selected variant.
    ///
    /// Each write is idempotent on (order_id, variant_id), so re-invoking
    /// the allocation for the same order updates rows instead of
    /// duplicating them. A failed row is logged and skipped; the batch
    /// never aborts.
    pub async fn allocate_order_items(
        &self,
        order_id: Uuid,
        items: &[ResolvedItem],
        number_of_people: i32,
    ) -> AppResult<AllocationOutcome> {
        let sizes = group_sizes(items);

        let planned: Vec<PlannedItem> = items
            .iter()
            .map(|item| {
                let members = sizes
                    .get(&item.group.as_ref().map(|g| g.id))
                    .copied()
                    .unwrap_or(1);
                PlannedItem {
                    variant_id: item.variant_id,
                    title: item.title.clone(),
                    quantity: computed_quantity(item.group.as_ref(), members, number_of_people),
                }
            })
            .collect();

        let results: Vec<(String, AppResult<()>)> = stream::iter(planned)
            .map(|item| async move {
                let title = item.title.clone();
                (title, self.persist_item(order_id, item).await)
            })
            .buffer_unordered(WRITE_CONCURRENCY)
            .collect()
            .await;

        let mut outcome = AllocationOutcome {
            created: 0,
            failed: 0,
        };
        for (title, result) in results {
            match result {
                Ok(()) => outcome.created += 1,
                Err(e) => {
                    outcome.failed += 1;
                    tracing::error!(order_id = %order_id, item = %title,
                        "failed to persist order item: {}", e);
                }
            }
        }

        Ok(outcome)
    }

    /// Write one order-item row with authoritative pricing
    async fn persist_item(&self, order_id: Uuid, item: PlannedItem) -> AppResult<()> {
        // Current variant values, not the caller's copy
        let (unit_price, cost_price): (Decimal, Option<Decimal>) =
            sqlx::query_as("SELECT price, cost_price FROM product_variants WHERE id = $1")
                .bind(item.variant_id)
                .fetch_one(&self.db)
                .await?;

        let unit_cost = cost_price.unwrap_or_else(|| fallback_unit_cost(unit_price));
        let total_item_price = unit_price * Decimal::from(item.quantity as i64);

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, variant_id, title, quantity, unit_price, unit_cost, total_item_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_id, variant_id)
            DO UPDATE SET quantity = EXCLUDED.quantity,
                          unit_price = EXCLUDED.unit_price,
                          unit_cost = EXCLUDED.unit_cost,
                          total_item_price = EXCLUDED.total_item_price
            "#,
        )
        .bind(order_id)
        .bind(item.variant_id)
        .bind(&item.title)
        .bind(item.quantity)
        .bind(unit_price)
        .bind(unit_cost)
        .bind(total_item_price)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
