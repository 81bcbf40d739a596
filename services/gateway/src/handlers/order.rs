//! Order-entry handlers.
//!
//! Every submit produces an execution report; fills are handed to the
//! market data publisher at execution time so TRADE frames go out without
//! waiting for the next tick.

use crate::error::AppError;
use crate::models::{CancelResponse, ExecutionReport, SubmitOrderRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use exchange_types::{ExchangeError, OrderId};
use market_data::events::QuotePayload;
use matching_engine::EngineStats;

pub async fn submit_order(
    State(state): State<AppState>,
    Json(request): Json<SubmitOrderRequest>,
) -> Result<Json<ExecutionReport>, AppError> {
    let order = request.into_order();
    let result = state.engine.submit(order);

    for trade in &result.trades {
        state.publisher.publish_trade(trade);
    }

    Ok(Json(ExecutionReport::from_result(&result)))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path((symbol, order_id)): Path<(String, u64)>,
) -> Result<Json<CancelResponse>, AppError> {
    let order_id = OrderId::from_u64(order_id);
    if state.engine.cancel(&symbol, order_id) {
        Ok(Json(CancelResponse {
            symbol,
            order_id,
            cancelled: true,
        }))
    } else {
        Err(AppError::NotFound(format!(
            "No active order {order_id} for {symbol}"
        )))
    }
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<QuotePayload>, AppError> {
    let quote = state
        .engine
        .quote(&symbol)
        .ok_or(ExchangeError::UnknownSymbol(symbol))?;
    Ok(Json(QuotePayload::from(&quote)))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<EngineStats> {
    Json(state.engine.stats())
}
