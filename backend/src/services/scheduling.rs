//! Scheduling guard: calendar exclusivity for themed parties and
//! per-order SLA
//!
//! Only festas (orders with a party type) reserve calendar days. Direct
//! orders never appear in the blocked set.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{blocked_days, event_day};

/// Scheduling service for availability checks
#[derive(Clone)]
pub struct SchedulingService {
    db: PgPool,
}

impl SchedulingService {
    /// Create a new SchedulingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Calendar days already reserved by themed-party orders, optionally
    /// excluding one order's own reservation (for self-conflict checks
    /// on update).
    pub async fn blocked_dates(&self, exclude: Option<Uuid>) -> AppResult<Vec<NaiveDate>> {
        // Cheap prefilter on the dated-orders index; the reservation rule
        // itself lives in the shared derivation
        let rows: Vec<(Uuid, Option<Uuid>, Option<DateTime<Utc>>)> = sqlx::query_as(
            r#"
            SELECT id, party_type_id, event_date
            FROM orders
            WHERE event_date IS NOT NULL
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(blocked_days(rows, exclude).into_iter().collect())
    }

    /// Gate a festa booking: the event's calendar day must not already be
    /// reserved by another festa.
    pub async fn ensure_day_available(
        &self,
        event_date: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let day = event_day(event_date);
        let blocked = self.blocked_dates(exclude).await?;
        if blocked.contains(&day) {
            return Err(AppError::Conflict {
                resource: "event_date".to_string(),
                message: format!("The date {} is already reserved for another party", day),
                message_pt: format!("A data {} já está reservada para outra festa", day),
            });
        }
        Ok(())
    }
}
