//! Quote HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::quote::{QuoteRequest, QuoteService};
use crate::AppState;

/// Build a priced quote for a basket without persisting anything
pub async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> impl IntoResponse {
    let service = QuoteService::new(state.db.clone());

    match service.build_quote(&request).await {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(e) => e.into_response(),
    }
}
