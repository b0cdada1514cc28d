//! Quote building: item resolution plus the pure price breakdown

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::CatalogService;
use shared::{
    compute_price_breakdown, validate_guest_count, validate_requested_items, PartyPricing,
    PriceBreakdown, RequestedItem, ResolvedItem,
};

/// Quote service: resolves the basket and prices it
#[derive(Clone)]
pub struct QuoteService {
    db: PgPool,
}

/// Input for building a quote
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub party_type_id: Option<Uuid>,
    pub items: Vec<RequestedItem>,
    pub number_of_people: i32,
    /// Reserved manual override; the client never sends it today
    pub extra_hours: Option<Decimal>,
}

/// A priced quote
#[derive(Debug, Serialize)]
pub struct Quote {
    pub party_type_id: Option<Uuid>,
    pub number_of_people: i32,
    pub items: Vec<ResolvedItem>,
    pub breakdown: PriceBreakdown,
}

impl QuoteService {
    /// Create a new QuoteService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve the requested items and compute the price breakdown.
    /// Nothing is persisted.
    pub async fn build_quote(&self, request: &QuoteRequest) -> AppResult<Quote> {
        if let Err(message) = validate_guest_count(request.number_of_people) {
            return Err(AppError::Validation {
                field: "number_of_people".to_string(),
                message: message.to_string(),
                message_pt: "O número de convidados deve ser pelo menos 1".to_string(),
            });
        }
        if let Err(message) = validate_requested_items(&request.items) {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: message.to_string(),
                message_pt: "Pelo menos um item deve ser selecionado".to_string(),
            });
        }

        let catalog = CatalogService::new(self.db.clone());

        let party = match request.party_type_id {
            Some(id) => Some(catalog.get_party_type(id).await?),
            None => None,
        };
        let items = catalog.resolve_items(&request.items).await?;

        let party_pricing = party.as_ref().map(|p| PartyPricing {
            duration_hours: p.duration_hours,
            price: p.price,
        });
        let breakdown = compute_price_breakdown(
            party_pricing.as_ref(),
            &items,
            request.number_of_people,
            request.extra_hours.unwrap_or(Decimal::ZERO),
        );

        Ok(Quote {
            party_type_id: request.party_type_id,
            number_of_people: request.number_of_people,
            items,
            breakdown,
        })
    }
}
