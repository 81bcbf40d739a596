//! Order lifecycle types.
//!
//! An [`Order`] is immutable: lifecycle transitions (`with_fill`,
//! `with_cancel`, `with_reject`) return a new value with the same
//! `order_id`. The order book always holds the current value and swaps it
//! on every transition, which keeps concurrent readers safe without
//! interior mutability.

use crate::ids::OrderId;
use crate::numeric::Price;
use crate::time;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type.
///
/// Only MARKET and LIMIT orders are executed by the matching engine. STOP
/// and STOP_LIMIT are accepted and tracked but rest inactive until a
/// trigger component activates them; none is wired up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
    PendingCancel,
}

impl OrderStatus {
    /// CANCELLED and REJECTED are terminal; FILLED is terminal once
    /// remaining quantity reaches zero.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// A trading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub client_order_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: u64,
    pub remaining_quantity: u64,
    pub client_id: String,
    pub timestamp: i64,
    pub status: OrderStatus,
}

impl Order {
    /// Admit a new order: assigns the next order id and stamps the
    /// admission time.
    pub fn new(
        client_order_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: u64,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            order_id: OrderId::next(),
            client_order_id: client_order_id.into(),
            symbol: symbol.into(),
            side,
            order_type,
            price,
            quantity,
            remaining_quantity: quantity,
            client_id: client_id.into(),
            timestamp: time::unix_millis(),
            status: OrderStatus::New,
        }
    }

    /// Apply a fill of `fill_quantity` shares, producing the successor
    /// value. FILLED exactly when nothing remains.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity; that would mean
    /// the book has corrupted itself and continuing is not safe.
    pub fn with_fill(&self, fill_quantity: u64) -> Self {
        assert!(
            fill_quantity <= self.remaining_quantity,
            "fill {} exceeds remaining {} on order {}",
            fill_quantity,
            self.remaining_quantity,
            self.order_id
        );
        let remaining = self.remaining_quantity - fill_quantity;
        Self {
            remaining_quantity: remaining,
            status: if remaining == 0 {
                OrderStatus::Filled
            } else {
                OrderStatus::PartiallyFilled
            },
            ..self.clone()
        }
    }

    /// Mark the order cancelled; remaining quantity is left as-is.
    pub fn with_cancel(&self) -> Self {
        Self {
            status: OrderStatus::Cancelled,
            ..self.clone()
        }
    }

    /// Mark the order rejected; remaining quantity is left as-is.
    pub fn with_reject(&self) -> Self {
        Self {
            status: OrderStatus::Rejected,
            ..self.clone()
        }
    }

    pub fn filled_quantity(&self) -> u64 {
        self.quantity - self.remaining_quantity
    }

    /// Active orders are the only ones that may rest in a book.
    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::New | OrderStatus::PartiallyFilled)
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}
