use crate::handlers::{order, ws};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Order-entry surface, served on the order-entry port.
pub fn order_entry_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(order::submit_order))
        .route("/orders/{symbol}/{order_id}", delete(order::cancel_order))
        .route("/quotes/{symbol}", get(order::get_quote))
        .route("/stats", get(order::get_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Market-data surface, served on the market-data port.
pub fn market_data_router(state: AppState) -> Router {
    Router::new()
        .route("/marketdata", get(ws::market_data_ws))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
