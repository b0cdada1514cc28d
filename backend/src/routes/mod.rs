//! Route definitions for the Festa Buffet Platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Quote preview
        .nest("/quotes", quote_routes())
        // Orders and budgets
        .nest("/orders", order_routes())
        // Calendar availability
        .nest("/availability", availability_routes())
        // Party-type catalog
        .nest("/party-types", party_type_routes())
}

/// Quote routes
fn quote_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::create_quote))
}

/// Order management routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders))
        .route("/festa", post(handlers::create_festa_order))
        .route("/encomenda", post(handlers::create_encomenda_order))
        .route(
            "/:order_id",
            get(handlers::get_order).put(handlers::update_order),
        )
        .route("/:order_id/status", put(handlers::update_order_status))
}

/// Availability routes
fn availability_routes() -> Router<AppState> {
    Router::new().route("/blocked-dates", get(handlers::get_blocked_dates))
}

/// Party-type catalog routes
fn party_type_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_party_types))
}
