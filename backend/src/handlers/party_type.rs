//! Party-type catalog HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::CatalogService;
use crate::AppState;

/// List party types for the quote UI
pub async fn list_party_types(State(state): State<AppState>) -> impl IntoResponse {
    let service = CatalogService::new(state.db.clone());

    match service.list_party_types().await {
        Ok(party_types) => (
            StatusCode::OK,
            Json(serde_json::json!({ "party_types": party_types })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
