//! Catalog resolution: turning requested item references into priced
//! variant records
//!
//! Requests mix opaque external ids (strings) with legacy numeric ids.
//! The store cannot filter on both in one query, so resolution is
//! two-phase: one bulk fetch covering every string id, then individual
//! lookups for whatever the bulk fetch missed.

use futures::future;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    GroupAllowance, ItemRef, PartyType, RequestedItem, ResolvedItem, DEFAULT_QUANTITY_PER_PEOPLE,
};

/// Catalog service for variant and party-type lookups
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Database row for a variant with its group membership
#[derive(Debug, Clone, sqlx::FromRow)]
struct VariantRow {
    id: Uuid,
    external_id: Option<String>,
    legacy_id: Option<i64>,
    title: String,
    price: Decimal,
    cost_price: Option<Decimal>,
    group_id: Option<Uuid>,
    quantity_per_people: Option<Decimal>,
}

const VARIANT_COLUMNS: &str = r#"
    SELECT v.id, v.external_id, v.legacy_id, v.title, v.price, v.cost_price,
           g.id AS group_id, g.quantity_per_people
    FROM product_variants v
    LEFT JOIN products p ON p.id = v.product_id
    LEFT JOIN product_groups g ON g.id = p.product_group_id
"#;

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve requested item references into priced variant records.
    ///
    /// Unmatched references are skipped rather than aborting the request.
    /// An empty fetch for a non-empty request is a not-found condition;
    /// a non-empty fetch that matches none of the references is a
    /// bad-request condition. Callers map these to 404 and 400.
    pub async fn resolve_items(&self, requested: &[RequestedItem]) -> AppResult<Vec<ResolvedItem>> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        // Phase 1: bulk fetch everything addressable by external id
        let external_ids: Vec<String> = requested
            .iter()
            .filter_map(|item| match &item.id {
                ItemRef::External(id) => Some(id.clone()),
                ItemRef::Internal(_) => None,
            })
            .collect();

        let mut fetched: Vec<VariantRow> = if external_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, VariantRow>(&format!("{} WHERE v.external_id = ANY($1)", VARIANT_COLUMNS))
                .bind(&external_ids)
                .fetch_all(&self.db)
                .await?
        };

        // Phase 2: individual lookups for every reference the bulk fetch
        // did not cover (all numeric-only references land here)
        let missing: Vec<&RequestedItem> = requested
            .iter()
            .filter(|item| find_match(&fetched, &item.id).is_none())
            .collect();

        let lookups = missing.iter().map(|item| self.fetch_variant(&item.id));
        for row in future::try_join_all(lookups).await?.into_iter().flatten() {
            if !fetched.iter().any(|existing| existing.id == row.id) {
                fetched.push(row);
            }
        }

        if fetched.is_empty() {
            return Err(AppError::NotFound("Items".to_string()));
        }

        // Match fetched variants back to the request, skipping misses
        let mut resolved = Vec::new();
        for item in requested {
            let Some(row) = find_match(&fetched, &item.id) else {
                tracing::debug!(reference = %item.id, "requested item not matched, skipping");
                continue;
            };
            let quantity = item.quantity_or_default();
            resolved.push(ResolvedItem {
                variant_id: row.id,
                reference: item.id.clone(),
                title: row.title.clone(),
                price: row.price,
                cost_price: row.cost_price,
                group: row.group_id.map(|id| GroupAllowance {
                    id,
                    quantity_per_people: row
                        .quantity_per_people
                        .unwrap_or_else(|| Decimal::from(DEFAULT_QUANTITY_PER_PEOPLE)),
                }),
                quantity,
                line_total: row.price * Decimal::from(quantity as i64),
            });
        }

        if resolved.is_empty() {
            return Err(AppError::ValidationError(
                "None of the requested items could be matched".to_string(),
            ));
        }

        Ok(resolved)
    }

    /// Fetch one variant by either identifier type
    async fn fetch_variant(&self, reference: &ItemRef) -> AppResult<Option<VariantRow>> {
        let row = match reference {
            ItemRef::External(id) => {
                sqlx::query_as::<_, VariantRow>(&format!(
                    "{} WHERE v.external_id = $1",
                    VARIANT_COLUMNS
                ))
                .bind(id)
                .fetch_optional(&self.db)
                .await?
            }
            ItemRef::Internal(id) => {
                sqlx::query_as::<_, VariantRow>(&format!(
                    "{} WHERE v.legacy_id = $1",
                    VARIANT_COLUMNS
                ))
                .bind(id)
                .fetch_optional(&self.db)
                .await?
            }
        };
        Ok(row)
    }

    /// Get a party type by id
    pub async fn get_party_type(&self, party_type_id: Uuid) -> AppResult<PartyType> {
        let row = sqlx::query_as::<_, PartyTypeRow>(
            r#"
            SELECT id, name, duration_hours, price, created_at
            FROM party_types
            WHERE id = $1
            "#,
        )
        .bind(party_type_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Party type".to_string()))?;

        Ok(row.into())
    }

    /// List all party types
    pub async fn list_party_types(&self) -> AppResult<Vec<PartyType>> {
        let rows = sqlx::query_as::<_, PartyTypeRow>(
            r#"
            SELECT id, name, duration_hours, price, created_at
            FROM party_types
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

/// Match a fetched variant to a request reference: primary string
/// identifier first, legacy numeric identifier second.
fn find_match<'a>(fetched: &'a [VariantRow], reference: &ItemRef) -> Option<&'a VariantRow> {
    if let ItemRef::External(id) = reference {
        if let Some(row) = fetched
            .iter()
            .find(|row| row.external_id.as_deref() == Some(id.as_str()))
        {
            return Some(row);
        }
    }

    let numeric = match reference {
        ItemRef::Internal(id) => Some(*id),
        ItemRef::External(id) => id.parse::<i64>().ok(),
    };
    numeric.and_then(|id| fetched.iter().find(|row| row.legacy_id == Some(id)))
}

/// Database row for a party type
#[derive(Debug, sqlx::FromRow)]
struct PartyTypeRow {
    id: Uuid,
    name: String,
    duration_hours: Decimal,
    price: Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PartyTypeRow> for PartyType {
    fn from(row: PartyTypeRow) -> Self {
        PartyType {
            id: row.id,
            name: row.name,
            duration_hours: row.duration_hours,
            price: row.price,
            created_at: row.created_at,
        }
    }
}
