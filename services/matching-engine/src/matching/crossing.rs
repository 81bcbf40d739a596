//! Crossing detection.
//!
//! A taker crosses a resting price when its bound allows the trade: a buy
//! limit crosses asks at or below it, a sell limit crosses bids at or
//! above it. Market orders have no bound and cross any resting price.

use exchange_types::{Order, OrderType, Price, Side};

/// The price bound an incoming order matches under.
///
/// `None` means unbounded (market order): every resting price crosses.
pub fn price_bound(order: &Order) -> Option<Price> {
    match order.order_type {
        OrderType::Market => None,
        _ => Some(order.price),
    }
}

/// Whether a taker on `taker_side` with the given bound crosses a resting
/// order at `resting_price`.
pub fn crosses(taker_side: Side, bound: Option<Price>, resting_price: Price) -> bool {
    match bound {
        None => true,
        Some(limit) => match taker_side {
            Side::Buy => limit >= resting_price,
            Side::Sell => limit <= resting_price,
        },
    }
}
