//! Calendar availability HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::SchedulingService;
use crate::AppState;

/// Query parameters for the blocked-dates listing
#[derive(Debug, Deserialize)]
pub struct BlockedDatesQuery {
    /// Order id whose own reservation should be ignored
    pub exclude: Option<Uuid>,
}

/// Days already reserved by themed-party orders
pub async fn get_blocked_dates(
    State(state): State<AppState>,
    Query(query): Query<BlockedDatesQuery>,
) -> impl IntoResponse {
    let service = SchedulingService::new(state.db.clone());

    match service.blocked_dates(query.exclude).await {
        Ok(dates) => (
            StatusCode::OK,
            Json(serde_json::json!({ "blocked_dates": dates })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
