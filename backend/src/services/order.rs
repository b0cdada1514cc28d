//! Order lifecycle: festa/encomenda creation, derived-cost reads, status
//! transitions and the append-only audit trail

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::quote::QuoteRequest;
use crate::services::{
    AllocationService, CatalogService, CostService, QuoteService, SchedulingService,
};
use shared::{
    deserialize_patch, merge_duplicate_items, sla_days, validate_contact_info,
    validate_guest_count, ContactInfo, DetailedOrderItem, Order, OrderItem, OrderStatus,
    RequestedItem,
};

/// Order service for budgets and direct orders
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for creating a themed-party order
#[derive(Debug, Deserialize)]
pub struct CreateFestaInput {
    pub party_type_id: Uuid,
    pub items: Vec<RequestedItem>,
    pub number_of_people: i32,
    pub event_date: Option<DateTime<Utc>>,
    pub contact: ContactInfo,
}

/// Input for creating a direct order ("encomenda")
#[derive(Debug, Deserialize)]
pub struct CreateEncomendaInput {
    pub items: Vec<DetailedOrderItem>,
    pub number_of_people: Option<i32>,
    pub event_date: Option<DateTime<Utc>>,
    pub contact: ContactInfo,
}

/// Input for editing an order; omitted fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    /// Absent = keep the stored date, explicit `null` = clear it
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub event_date: Option<Option<DateTime<Utc>>>,
    pub number_of_people: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
}

/// Input for a status transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
}

/// An order with its items, the recomputed cost total and the SLA
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Signed days until the event; negative means overdue
    pub sla_days: Option<i64>,
}

/// Database row for an order
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    party_type_id: Option<Uuid>,
    status: String,
    event_date: Option<DateTime<Utc>>,
    number_of_people: i32,
    total_price: Decimal,
    total_cost_price: Decimal,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    customer_address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            party_type_id: row.party_type_id,
            status: OrderStatus::from_str(&row.status).unwrap_or(OrderStatus::Pendente),
            event_date: row.event_date,
            number_of_people: row.number_of_people,
            total_price: row.total_price,
            total_cost_price: row.total_cost_price,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            customer_address: row.customer_address,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for an order item
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    variant_id: Option<Uuid>,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    unit_cost: Option<Decimal>,
    total_item_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            variant_id: row.variant_id,
            title: row.title,
            quantity: row.quantity,
            unit_price: row.unit_price,
            unit_cost: row.unit_cost,
            total_item_price: row.total_item_price,
        }
    }
}

const ORDER_COLUMNS: &str = r#"
    SELECT id, party_type_id, status, event_date, number_of_people,
           total_price, total_cost_price, customer_name, customer_phone,
           customer_email, customer_address, notes, created_at, updated_at
    FROM orders
"#;

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a themed-party order: price the basket, gate the calendar
    /// day, persist the order, then allocate its items (best-effort).
    pub async fn create_festa(&self, input: CreateFestaInput) -> AppResult<OrderDetail> {
        validate_contact(&input.contact)?;

        let quote_service = QuoteService::new(self.db.clone());
        let quote = quote_service
            .build_quote(&QuoteRequest {
                party_type_id: Some(input.party_type_id),
                items: input.items.clone(),
                number_of_people: input.number_of_people,
                extra_hours: None,
            })
            .await?;

        if let Some(event_date) = input.event_date {
            SchedulingService::new(self.db.clone())
                .ensure_day_available(event_date, None)
                .await?;
        }

        let order_id = self
            .insert_order(
                &self.db,
                Some(input.party_type_id),
                input.event_date,
                input.number_of_people,
                quote.breakdown.total_price,
                &input.contact,
            )
            .await?;

        let allocation = AllocationService::new(self.db.clone())
            .allocate_order_items(order_id, &quote.items, input.number_of_people)
            .await?;

        self.snapshot_cost(order_id).await;
        self.append_event(
            order_id,
            "budget_created",
            serde_json::json!({
                "breakdown": quote.breakdown,
                "allocation": allocation,
            }),
        )
        .await;

        self.get_order(order_id).await
    }

    /// Create a direct order from client-detailed lines. Costs are
    /// resolved through the catalog before the items exist; lines whose
    /// reference cannot be linked keep their submitted title and price.
    pub async fn create_encomenda(&self, input: CreateEncomendaInput) -> AppResult<OrderDetail> {
        validate_contact(&input.contact)?;
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one item is required".to_string(),
                message_pt: "Pelo menos um item deve ser informado".to_string(),
            });
        }
        let number_of_people = input.number_of_people.unwrap_or(1);
        if let Err(message) = validate_guest_count(number_of_people) {
            return Err(AppError::Validation {
                field: "number_of_people".to_string(),
                message: message.to_string(),
                message_pt: "O número de convidados deve ser pelo menos 1".to_string(),
            });
        }

        // Repeated references would collide on the per-order uniqueness
        // of persisted lines
        let items = merge_duplicate_items(input.items);

        let cost_map = CostService::new(self.db.clone()).cost_map(&items).await;
        let linked = self.link_variants(&items).await;

        let total_price: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity.max(0) as i64))
            .sum();

        // Order row and item rows land together or not at all
        let mut tx = self.db.begin().await?;
        let order_id = self
            .insert_order(
                &mut *tx,
                None,
                input.event_date,
                number_of_people,
                total_price,
                &input.contact,
            )
            .await?;

        for item in &items {
            let key = item.id.to_string();
            // Distinct references can still link to the same variant;
            // accumulate instead of failing the batch
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, variant_id, title, quantity, unit_price, unit_cost, total_item_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (order_id, variant_id)
                DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity,
                              total_item_price = order_items.total_item_price + EXCLUDED.total_item_price
                "#,
            )
            .bind(order_id)
            .bind(linked.get(&key).copied())
            .bind(&item.title)
            .bind(item.quantity)
            .bind(item.price)
            .bind(cost_map.unit_costs.get(&key).copied())
            .bind(item.price * Decimal::from(item.quantity.max(0) as i64))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        self.snapshot_cost(order_id).await;
        self.append_event(
            order_id,
            "order_created",
            serde_json::json!({ "total_cost": cost_map.total_cost }),
        )
        .await;

        self.get_order(order_id).await
    }

    /// Get an order with its items. The cost total is always recomputed
    /// from item-level data; the stored value is ignored.
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderDetail> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = $1", ORDER_COLUMNS))
            .bind(order_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let mut order: Order = row.into();
        order.total_cost_price = CostService::new(self.db.clone())
            .total_cost_price(order_id)
            .await;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, variant_id, title, quantity, unit_price, unit_cost, total_item_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY title
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let sla = order
            .event_date
            .map(|event_date| sla_days(event_date, Utc::now().date_naive()));

        Ok(OrderDetail {
            order,
            items: items.into_iter().map(|r| r.into()).collect(),
            sla_days: sla,
        })
    }

    /// List orders, optionally filtered by status, newest first. Cost
    /// totals are recomputed per order.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{} WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        let cost = CostService::new(self.db.clone());
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let mut order: Order = row.into();
            order.total_cost_price = cost.total_cost_price(order.id).await;
            orders.push(order);
        }
        Ok(orders)
    }

    /// Apply a status transition, validated against the pipeline rules
    pub async fn update_status(
        &self,
        order_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<OrderDetail> {
        let (status, event_date): (String, Option<DateTime<Utc>>) =
            sqlx::query_as("SELECT status, event_date FROM orders WHERE id = $1")
                .bind(order_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let current = OrderStatus::from_str(&status).unwrap_or(OrderStatus::Pendente);
        current
            .validate_transition(input.status, event_date.is_some())
            .map_err(|e| AppError::InvalidStateTransition(e.to_string()))?;

        sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(input.status.as_str())
            .bind(order_id)
            .execute(&self.db)
            .await?;

        self.append_event(
            order_id,
            "status_changed",
            serde_json::json!({ "from": current, "to": input.status }),
        )
        .await;

        self.get_order(order_id).await
    }

    /// Edit order fields. Moving a festa's event date re-runs the
    /// calendar gate, excluding the order's own reservation.
    pub async fn update_order(
        &self,
        order_id: Uuid,
        input: UpdateOrderInput,
    ) -> AppResult<OrderDetail> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = $1", ORDER_COLUMNS))
            .bind(order_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
        let existing: Order = row.into();

        if let Some(number_of_people) = input.number_of_people {
            if let Err(message) = validate_guest_count(number_of_people) {
                return Err(AppError::Validation {
                    field: "number_of_people".to_string(),
                    message: message.to_string(),
                    message_pt: "O número de convidados deve ser pelo menos 1".to_string(),
                });
            }
        }

        if let Some(Some(event_date)) = input.event_date {
            if existing.is_festa() {
                SchedulingService::new(self.db.clone())
                    .ensure_day_available(event_date, Some(order_id))
                    .await?;
            }
        }

        // Absent keeps the stored date; an explicit null clears it
        let event_date = match input.event_date {
            Some(value) => value,
            None => existing.event_date,
        };
        let number_of_people = input.number_of_people.unwrap_or(existing.number_of_people);
        let customer_name = input.customer_name.unwrap_or(existing.customer_name);
        let customer_phone = input.customer_phone.unwrap_or(existing.customer_phone);
        let customer_email = input.customer_email.or(existing.customer_email);
        let customer_address = input.customer_address.or(existing.customer_address);
        let notes = input.notes.or(existing.notes);

        sqlx::query(
            r#"
            UPDATE orders
            SET event_date = $1, number_of_people = $2, customer_name = $3,
                customer_phone = $4, customer_email = $5, customer_address = $6,
                notes = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(event_date)
        .bind(number_of_people)
        .bind(&customer_name)
        .bind(&customer_phone)
        .bind(&customer_email)
        .bind(&customer_address)
        .bind(&notes)
        .bind(order_id)
        .execute(&self.db)
        .await?;

        self.append_event(order_id, "order_updated", serde_json::json!({})).await;

        self.get_order(order_id).await
    }

    async fn insert_order<'e, E>(
        &self,
        executor: E,
        party_type_id: Option<Uuid>,
        event_date: Option<DateTime<Utc>>,
        number_of_people: i32,
        total_price: Decimal,
        contact: &ContactInfo,
    ) -> AppResult<Uuid>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (
                party_type_id, status, event_date, number_of_people,
                total_price, total_cost_price, customer_name, customer_phone,
                customer_email, customer_address, notes
            )
            VALUES ($1, 'pendente', $2, $3, $4, 0, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(party_type_id)
        .bind(event_date)
        .bind(number_of_people)
        .bind(total_price)
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(&contact.address)
        .bind(&contact.notes)
        .fetch_one(executor)
        .await?;

        Ok(order_id)
    }

    /// Try to link submitted references to catalog variants. Best-effort:
    /// an unresolvable basket just leaves the lines unlinked.
    async fn link_variants(&self, items: &[DetailedOrderItem]) -> HashMap<String, Uuid> {
        let requested: Vec<RequestedItem> = items
            .iter()
            .map(|item| RequestedItem {
                id: item.id.clone(),
                quantity: Some(item.quantity),
            })
            .collect();

        match CatalogService::new(self.db.clone()).resolve_items(&requested).await {
            Ok(resolved) => resolved
                .into_iter()
                .map(|item| (item.reference.to_string(), item.variant_id))
                .collect(),
            Err(e) => {
                tracing::debug!("could not link order lines to catalog variants: {}", e);
                HashMap::new()
            }
        }
    }

    /// Persist a best-effort snapshot of the derived cost total. Reads
    /// recompute it regardless.
    async fn snapshot_cost(&self, order_id: Uuid) {
        let total_cost = CostService::new(self.db.clone())
            .total_cost_price(order_id)
            .await;
        if let Err(e) = sqlx::query("UPDATE orders SET total_cost_price = $1 WHERE id = $2")
            .bind(total_cost)
            .bind(order_id)
            .execute(&self.db)
            .await
        {
            tracing::warn!(order_id = %order_id, "failed to snapshot cost total: {}", e);
        }
    }

    /// Append an audit event. Failures are logged, never surfaced: the
    /// audit trail must not break order processing.
    async fn append_event(&self, order_id: Uuid, event_type: &str, payload: serde_json::Value) {
        if let Err(e) = sqlx::query(
            "INSERT INTO order_events (order_id, event_type, payload) VALUES ($1, $2, $3)",
        )
        .bind(order_id)
        .bind(event_type)
        .bind(&payload)
        .execute(&self.db)
        .await
        {
            tracing::warn!(order_id = %order_id, event_type, "failed to append order event: {}", e);
        }
    }
}

/// Shared contact validation with bilingual error mapping
fn validate_contact(contact: &ContactInfo) -> AppResult<()> {
    if let Err(message) = validate_contact_info(contact) {
        return Err(AppError::Validation {
            field: "contact".to_string(),
            message: message.to_string(),
            message_pt: "Dados de contato inválidos".to_string(),
        });
    }
    Ok(())
}
