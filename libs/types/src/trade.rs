//! Trade execution records.

use crate::ids::{OrderId, TradeId};
use crate::numeric::Price;
use crate::time;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single execution between a buy order and a sell order.
///
/// The price is always the resting (maker) order's price. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub symbol: String,
    pub price: Price,
    pub quantity: u64,
    pub timestamp: i64,
    pub buy_client_id: String,
    pub sell_client_id: String,
}

impl Trade {
    /// Record an execution: assigns the next trade id and stamps the
    /// execution time.
    pub fn new(
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        symbol: impl Into<String>,
        price: Price,
        quantity: u64,
        buy_client_id: impl Into<String>,
        sell_client_id: impl Into<String>,
    ) -> Self {
        Self {
            trade_id: TradeId::next(),
            buy_order_id,
            sell_order_id,
            symbol: symbol.into(),
            price,
            quantity,
            timestamp: time::unix_millis(),
            buy_client_id: buy_client_id.into(),
            sell_client_id: sell_client_id.into(),
        }
    }

    /// Traded value: `price × quantity`.
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.quantity)
    }
}
