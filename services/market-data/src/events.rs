//! Market data wire messages.
//!
//! Every frame sent to a subscriber is a `MarketDataMessage` envelope:
//! `{type, symbol, timestamp, data}`. Depth snapshots and quotes go out on
//! the publication tick; trades go out at execution time.

use exchange_types::{time, OrderId, Price, Trade, TradeId};
use matching_engine::{OrderBookSnapshot, Quote};
use rust_decimal::Decimal;
use serde::Serialize;

/// Envelope event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventType {
    #[serde(rename = "ORDER_BOOK")]
    OrderBook,
    #[serde(rename = "QUOTE")]
    Quote,
    #[serde(rename = "TRADE")]
    Trade,
}

/// Top-of-book payload. Prices are null when that side of the book is
/// empty; the spread exists only when both sides do.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    pub symbol: String,
    pub bid_price: Option<Price>,
    pub bid_quantity: u64,
    pub ask_price: Option<Price>,
    pub ask_quantity: u64,
    pub spread: Option<Decimal>,
}

impl From<&Quote> for QuotePayload {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            bid_price: quote.bid_price,
            bid_quantity: quote.bid_quantity,
            ask_price: quote.ask_price,
            ask_quantity: quote.ask_quantity,
            spread: quote.spread(),
        }
    }
}

/// Public trade payload. Client identities stay private.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePayload {
    pub trade_id: TradeId,
    pub symbol: String,
    pub price: Price,
    pub quantity: u64,
    pub timestamp: i64,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
}

impl From<&Trade> for TradePayload {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id,
            symbol: trade.symbol.clone(),
            price: trade.price,
            quantity: trade.quantity,
            timestamp: trade.timestamp,
            buy_order_id: trade.buy_order_id,
            sell_order_id: trade.sell_order_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    OrderBook(OrderBookSnapshot),
    Quote(QuotePayload),
    Trade(TradePayload),
}

/// The envelope shipped to every subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct MarketDataMessage {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub symbol: String,
    pub timestamp: i64,
    pub data: EventPayload,
}

impl MarketDataMessage {
    pub fn order_book(snapshot: OrderBookSnapshot) -> Self {
        Self {
            event_type: EventType::OrderBook,
            symbol: snapshot.symbol.clone(),
            timestamp: snapshot.timestamp,
            data: EventPayload::OrderBook(snapshot),
        }
    }

    pub fn quote(quote: &Quote) -> Self {
        Self {
            event_type: EventType::Quote,
            symbol: quote.symbol.clone(),
            timestamp: time::unix_millis(),
            data: EventPayload::Quote(QuotePayload::from(quote)),
        }
    }

    pub fn trade(trade: &Trade) -> Self {
        Self {
            event_type: EventType::Trade,
            symbol: trade.symbol.clone(),
            timestamp: time::unix_millis(),
            data: EventPayload::Trade(TradePayload::from(trade)),
        }
    }

    /// Serialize to the JSON text frame sent over the wire.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
