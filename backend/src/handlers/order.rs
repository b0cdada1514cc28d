//! Order management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::order::{
    CreateEncomendaInput, CreateFestaInput, OrderService, UpdateOrderInput, UpdateStatusInput,
};
use crate::AppState;
use shared::OrderStatus;

/// Query parameters for listing orders
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

/// List orders, optionally filtered by status
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());
    let status = query.status.as_deref().and_then(OrderStatus::from_str);

    match service.list_orders(status).await {
        Ok(orders) => {
            (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get an order with items, recomputed cost total and SLA
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.get_order(order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a themed-party order
pub async fn create_festa_order(
    State(state): State<AppState>,
    Json(input): Json<CreateFestaInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.create_festa(input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a direct order
pub async fn create_encomenda_order(
    State(state): State<AppState>,
    Json(input): Json<CreateEncomendaInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.create_encomenda(input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit order fields
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.update_order(order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply a status transition
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.update_status(order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
