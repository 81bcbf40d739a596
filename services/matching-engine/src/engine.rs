//! Multi-symbol matching engine.
//!
//! Owns one order book per configured symbol. The symbol map is built at
//! construction and never changes, so lookup needs no lock; each book sits
//! behind its own mutex and that mutex is the serialization boundary for
//! everything that touches the book (submit, cancel, snapshot, quote).
//! Operations on different symbols run in parallel.

use exchange_types::{Order, OrderId, Price, Trade};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::book::{OrderBook, OrderBookSnapshot};

/// Outcome of submitting an order: the post-match order value, the trades
/// it produced, and the rejection reason if validation failed.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order: Order,
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl OrderResult {
    fn rejected(order: Order, reason: impl Into<String>) -> Self {
        Self {
            order: order.with_reject(),
            trades: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.error.is_some()
    }
}

/// Top of book for one symbol. Either side may be absent when that side of
/// the book is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub bid_price: Option<Price>,
    pub bid_quantity: u64,
    pub ask_price: Option<Price>,
    pub ask_quantity: u64,
}

impl Quote {
    /// `ask − bid`, defined only when both sides are present.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.ask_price, self.bid_price) {
            (Some(ask), Some(bid)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }
}

/// Engine-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub total_orders: u64,
    pub total_trades: u64,
    pub total_buy_orders: u64,
    pub total_sell_orders: u64,
    pub active_symbols: usize,
}

pub struct MatchingEngine {
    books: HashMap<String, Mutex<OrderBook>>,
    symbols: Vec<String>,
    total_orders: AtomicU64,
    total_trades: AtomicU64,
    max_depth_levels: usize,
    verbose: bool,
}

impl MatchingEngine {
    /// Build an engine with one book per symbol. The symbol universe is
    /// fixed for the life of the engine.
    pub fn new(symbols: Vec<String>, max_depth_levels: usize, verbose: bool) -> Self {
        let mut books = HashMap::new();
        for symbol in &symbols {
            books.insert(symbol.clone(), Mutex::new(OrderBook::new(symbol.clone())));
            info!(symbol = %symbol, "initialized order book");
        }
        Self {
            books,
            symbols,
            total_orders: AtomicU64::new(0),
            total_trades: AtomicU64::new(0),
            max_depth_levels,
            verbose,
        }
    }

    /// Validate and process a new order.
    ///
    /// Validation failures return a REJECTED order with a reason instead of
    /// an error; nothing is mutated in that case. On success the result
    /// carries the post-match order value read back from the book.
    pub fn submit(&self, order: Order) -> OrderResult {
        let Some(book) = self.books.get(&order.symbol) else {
            warn!(symbol = %order.symbol, "rejected order for unknown symbol");
            return OrderResult::rejected(order, "Unknown symbol");
        };

        if let Some(reason) = validate(&order) {
            warn!(order_id = %order.order_id, %reason, "rejected order");
            return OrderResult::rejected(order, reason);
        }

        let order_id = order.order_id;
        let (updated, trades) = {
            let mut book = book.lock().expect("order book lock poisoned");
            let trades = book.add(order.clone());
            let updated = book.order(order_id).cloned().unwrap_or(order);
            (updated, trades)
        };

        self.total_orders.fetch_add(1, Ordering::Relaxed);
        self.total_trades
            .fetch_add(trades.len() as u64, Ordering::Relaxed);

        if self.verbose {
            info!(
                order_id = %updated.order_id,
                status = ?updated.status,
                trades = trades.len(),
                "processed order"
            );
            for trade in &trades {
                info!(
                    trade_id = %trade.trade_id,
                    price = %trade.price,
                    quantity = trade.quantity,
                    "trade executed"
                );
            }
        }

        OrderResult {
            order: updated,
            trades,
            error: None,
        }
    }

    /// Cancel an order. False for unknown symbols, unknown ids, and orders
    /// that are no longer active.
    pub fn cancel(&self, symbol: &str, order_id: OrderId) -> bool {
        let Some(book) = self.books.get(symbol) else {
            warn!(%symbol, "cannot cancel order for unknown symbol");
            return false;
        };

        let cancelled = book
            .lock()
            .expect("order book lock poisoned")
            .cancel(order_id);
        if cancelled && self.verbose {
            info!(%symbol, %order_id, "cancelled order");
        }
        cancelled
    }

    /// Depth snapshot for one symbol, capped at the configured level count.
    pub fn snapshot(&self, symbol: &str) -> Option<OrderBookSnapshot> {
        self.books.get(symbol).map(|book| {
            book.lock()
                .expect("order book lock poisoned")
                .snapshot(self.max_depth_levels)
        })
    }

    /// Best bid and ask for one symbol.
    pub fn quote(&self, symbol: &str) -> Option<Quote> {
        self.books.get(symbol).map(|book| {
            let book = book.lock().expect("order book lock poisoned");
            let bid = book.best_bid();
            let ask = book.best_ask();
            Quote {
                symbol: symbol.to_string(),
                bid_price: bid.map(|level| level.price),
                bid_quantity: bid.map(|level| level.quantity).unwrap_or(0),
                ask_price: ask.map(|level| level.price),
                ask_quantity: ask.map(|level| level.quantity).unwrap_or(0),
            }
        })
    }

    pub fn stats(&self) -> EngineStats {
        let mut total_buy_orders = 0;
        let mut total_sell_orders = 0;
        for book in self.books.values() {
            let book = book.lock().expect("order book lock poisoned");
            total_buy_orders += book.total_buy_orders();
            total_sell_orders += book.total_sell_orders();
        }
        EngineStats {
            total_orders: self.total_orders.load(Ordering::Relaxed),
            total_trades: self.total_trades.load(Ordering::Relaxed),
            total_buy_orders,
            total_sell_orders,
            active_symbols: self.books.len(),
        }
    }

    /// The configured symbol universe, in configuration order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// First failing validation reason, if any. The symbol is checked by the
/// caller via book lookup.
fn validate(order: &Order) -> Option<String> {
    if order.quantity == 0 {
        return Some(format!("Invalid quantity: {}", order.quantity));
    }
    if order.order_type == exchange_types::OrderType::Limit && order.price.is_zero() {
        return Some(format!("Invalid price for limit order: {}", order.price));
    }
    if order.client_order_id.trim().is_empty() {
        return Some("Missing client order ID".to_string());
    }
    if order.client_id.trim().is_empty() {
        return Some("Missing client ID".to_string());
    }
    None
}
