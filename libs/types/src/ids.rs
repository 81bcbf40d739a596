//! Identifier types for exchange entities.
//!
//! Order and trade ids are process-wide sequential integers handed out by
//! atomic counters, so admission order doubles as the time-priority
//! tiebreak. Ids are unique across all symbols; callers must not assume
//! they are dense per symbol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static ORDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TRADE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Draw the next id from the global order sequence.
    pub fn next() -> Self {
        Self(ORDER_SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    /// Draw the next id from the global trade sequence.
    pub fn next() -> Self {
        Self(TRADE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
