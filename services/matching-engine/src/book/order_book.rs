//! One symbol's order book: matching, cancellation, and snapshots.
//!
//! The book owns its two ladders plus `by_id`, the map from order id to
//! the order's current value for every order the book has ever accepted.
//! Only active orders rest in a ladder; `by_id` also remembers filled and
//! inactive orders so post-trade lookups and cancel checks work.
//!
//! The book itself is single-threaded; the engine wraps each book in a
//! mutex and serializes every operation through it.

use exchange_types::{time, Order, OrderId, OrderType, Side, Trade};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::matching::crossing;

use super::ask_book::AskBook;
use super::bid_book::BidBook;
use super::BookLevel;

/// Point-in-time depth view: top levels per side, bids highest-first and
/// asks lowest-first, each aggregating remaining quantity at that price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub timestamp: i64,
}

#[derive(Debug, Default)]
pub struct OrderBook {
    symbol: String,
    bids: BidBook,
    asks: AskBook,
    by_id: HashMap<OrderId, Order>,
    total_buy_orders: u64,
    total_sell_orders: u64,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Add an order to the book, matching it against the opposite side
    /// first. Returns the trades produced by this call, in execution
    /// order.
    ///
    /// LIMIT residuals rest in the order's own ladder. MARKET residuals
    /// are discarded: a market order that finds no liquidity simply never
    /// rests, and its status stays NEW. STOP and STOP_LIMIT orders are
    /// recorded but rest inactive awaiting a trigger that this book does
    /// not model.
    pub fn add(&mut self, order: Order) -> Vec<Trade> {
        if order.quantity == 0 {
            return Vec::new();
        }

        if matches!(order.order_type, OrderType::Stop | OrderType::StopLimit) {
            self.by_id.insert(order.order_id, order);
            return Vec::new();
        }

        let trades = match order.side {
            Side::Buy => self.match_against_asks(&order),
            Side::Sell => self.match_against_bids(&order),
        };

        // The match walk worked off the pre-fill value; apply the total
        // fill once so `by_id` holds the true post-match state.
        let total_filled: u64 = trades.iter().map(|t| t.quantity).sum();
        let updated = if total_filled > 0 {
            order.with_fill(total_filled)
        } else {
            order
        };

        if updated.remaining_quantity > 0 && updated.order_type == OrderType::Limit {
            match updated.side {
                Side::Buy => {
                    self.bids.insert(updated.clone());
                    self.total_buy_orders += 1;
                }
                Side::Sell => {
                    self.asks.insert(updated.clone());
                    self.total_sell_orders += 1;
                }
            }
        }
        self.by_id.insert(updated.order_id, updated);

        trades
    }

    /// Cancel a resting order. False when the id is unknown, the order is
    /// no longer active, or it never rested in a ladder.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some(order) = self.by_id.get(&order_id).cloned() else {
            return false;
        };
        if !order.is_active() {
            return false;
        }

        let removed = match order.side {
            Side::Buy => self.bids.remove(&order),
            Side::Sell => self.asks.remove(&order),
        };
        if removed {
            match order.side {
                Side::Buy => self.total_buy_orders -= 1,
                Side::Sell => self.total_sell_orders -= 1,
            }
            self.by_id.remove(&order_id);
        }
        removed
    }

    /// Current value of an order this book has accepted.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.by_id.get(&order_id)
    }

    pub fn best_bid(&self) -> Option<BookLevel> {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Option<BookLevel> {
        self.asks.best()
    }

    pub fn snapshot(&self, max_levels: usize) -> OrderBookSnapshot {
        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth(max_levels),
            asks: self.asks.depth(max_levels),
            timestamp: time::unix_millis(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of buy orders currently resting.
    pub fn total_buy_orders(&self) -> u64 {
        self.total_buy_orders
    }

    /// Number of sell orders currently resting.
    pub fn total_sell_orders(&self) -> u64 {
        self.total_sell_orders
    }

    /// Walk the ask ladder from the lowest price, filling the incoming buy
    /// order against queue heads until its bound stops crossing or its
    /// quantity is exhausted.
    fn match_against_asks(&mut self, taker: &Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut remaining = taker.remaining_quantity;
        let bound = crossing::price_bound(taker);

        while remaining > 0 {
            let Some(level_price) = self.asks.best_price() else {
                break;
            };
            if !crossing::crosses(Side::Buy, bound, level_price) {
                break;
            }

            let level = self
                .asks
                .level_mut(level_price)
                .expect("best ask level must exist");
            while remaining > 0 {
                let Some(maker) = level.front().cloned() else {
                    break;
                };

                let delta = remaining.min(maker.remaining_quantity);
                assert!(
                    delta > 0,
                    "resting order {} has zero remaining quantity",
                    maker.order_id
                );
                trades.push(Trade::new(
                    taker.order_id,
                    maker.order_id,
                    &self.symbol,
                    level_price,
                    delta,
                    &taker.client_id,
                    &maker.client_id,
                ));
                remaining -= delta;

                let updated_maker = maker.with_fill(delta);
                if updated_maker.remaining_quantity == 0 {
                    level.pop_front();
                    self.total_sell_orders -= 1;
                } else {
                    level.replace_front(updated_maker.clone());
                }
                self.by_id.insert(updated_maker.order_id, updated_maker);
            }

            if level.is_empty() {
                self.asks.remove_level(level_price);
            }
        }

        trades
    }

    /// Mirror walk for an incoming sell order against the bid ladder.
    fn match_against_bids(&mut self, taker: &Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut remaining = taker.remaining_quantity;
        let bound = crossing::price_bound(taker);

        while remaining > 0 {
            let Some(level_price) = self.bids.best_price() else {
                break;
            };
            if !crossing::crosses(Side::Sell, bound, level_price) {
                break;
            }

            let level = self
                .bids
                .level_mut(level_price)
                .expect("best bid level must exist");
            while remaining > 0 {
                let Some(maker) = level.front().cloned() else {
                    break;
                };

                let delta = remaining.min(maker.remaining_quantity);
                assert!(
                    delta > 0,
                    "resting order {} has zero remaining quantity",
                    maker.order_id
                );
                trades.push(Trade::new(
                    maker.order_id,
                    taker.order_id,
                    &self.symbol,
                    level_price,
                    delta,
                    &maker.client_id,
                    &taker.client_id,
                ));
                remaining -= delta;

                let updated_maker = maker.with_fill(delta);
                if updated_maker.remaining_quantity == 0 {
                    level.pop_front();
                    self.total_buy_orders -= 1;
                } else {
                    level.replace_front(updated_maker.clone());
                }
                self.by_id.insert(updated_maker.order_id, updated_maker);
            }

            if level.is_empty() {
                self.bids.remove_level(level_price);
            }
        }

        trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_types::{OrderStatus, Price};

    fn book() -> OrderBook {
        OrderBook::new("AAPL")
    }

    fn limit(side: Side, price: &str, quantity: u64, client: &str) -> Order {
        Order::new(
            format!("{client}-ord"),
            "AAPL",
            side,
            OrderType::Limit,
            price.parse().unwrap(),
            quantity,
            client,
        )
    }

    fn market(side: Side, quantity: u64, client: &str) -> Order {
        Order::new(
            format!("{client}-mkt"),
            "AAPL",
            side,
            OrderType::Market,
            Price::ZERO,
            quantity,
            client,
        )
    }

    #[test]
    fn non_crossing_limit_rests_with_full_quantity() {
        let mut book = book();
        let order = limit(Side::Buy, "150.00", 100, "CLIENT1");

        let trades = book.add(order.clone());

        assert!(trades.is_empty());
        assert_eq!(book.total_buy_orders(), 1);
        let resting = book.order(order.order_id).unwrap();
        assert_eq!(resting.remaining_quantity, 100);
        assert_eq!(resting.status, OrderStatus::New);
        assert_eq!(book.best_bid().unwrap().quantity, 100);
    }

    #[test]
    fn crossing_limit_trades_at_resting_price() {
        let mut book = book();
        let sell = limit(Side::Sell, "150.00", 100, "CLIENT2");
        book.add(sell.clone());

        // Taker is willing to pay more; the trade still prints at the
        // maker's price.
        let buy = limit(Side::Buy, "151.00", 100, "CLIENT1");
        let trades = book.add(buy.clone());

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, "150.00".parse().unwrap());
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(trades[0].buy_order_id, buy.order_id);
        assert_eq!(trades[0].sell_order_id, sell.order_id);
        assert_eq!(trades[0].buy_client_id, "CLIENT1");
        assert_eq!(trades[0].sell_client_id, "CLIENT2");

        assert_eq!(book.total_buy_orders(), 0);
        assert_eq!(book.total_sell_orders(), 0);
        assert!(book.order(buy.order_id).unwrap().is_filled());
        assert!(book.order(sell.order_id).unwrap().is_filled());
    }

    #[test]
    fn taker_sweeps_multiple_levels_best_price_first() {
        let mut book = book();
        book.add(limit(Side::Sell, "151.00", 100, "CLIENT2"));
        book.add(limit(Side::Sell, "150.00", 100, "CLIENT3"));

        let buy = limit(Side::Buy, "151.00", 150, "CLIENT1");
        let trades = book.add(buy.clone());

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].price, "150.00".parse().unwrap());
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(trades[1].price, "151.00".parse().unwrap());
        assert_eq!(trades[1].quantity, 50);

        let taker = book.order(buy.order_id).unwrap();
        assert!(taker.is_filled());
        // 50 shares remain on the 151 ask.
        assert_eq!(book.best_ask().unwrap().quantity, 50);
    }

    #[test]
    fn partial_fill_rests_the_residual() {
        let mut book = book();
        book.add(limit(Side::Sell, "150.00", 100, "CLIENT2"));

        let buy = limit(Side::Buy, "150.00", 150, "CLIENT1");
        let trades = book.add(buy.clone());

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 100);

        let resting = book.order(buy.order_id).unwrap();
        assert_eq!(resting.status, OrderStatus::PartiallyFilled);
        assert_eq!(resting.remaining_quantity, 50);
        assert_eq!(book.best_bid().unwrap().quantity, 50);
        assert_eq!(book.total_buy_orders(), 1);
        assert_eq!(book.total_sell_orders(), 0);
    }

    #[test]
    fn market_order_residual_is_discarded() {
        let mut book = book();
        book.add(limit(Side::Sell, "150.00", 100, "CLIENT2"));

        let buy = market(Side::Buy, 150, "CLIENT1");
        let trades = book.add(buy.clone());

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 100);

        let taker = book.order(buy.order_id).unwrap();
        assert_eq!(taker.status, OrderStatus::PartiallyFilled);
        assert_eq!(taker.remaining_quantity, 50);
        // Residual does not rest anywhere.
        assert!(book.best_bid().is_none());
        assert_eq!(book.total_buy_orders(), 0);
    }

    #[test]
    fn market_order_against_empty_book_does_nothing() {
        let mut book = book();
        let buy = market(Side::Buy, 50, "CLIENT1");

        let trades = book.add(buy.clone());

        assert!(trades.is_empty());
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        let order = book.order(buy.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.remaining_quantity, 50);
    }

    #[test]
    fn zero_quantity_order_is_dropped() {
        let mut book = book();
        let order = limit(Side::Buy, "150.00", 0, "CLIENT1");

        let trades = book.add(order);

        assert!(trades.is_empty());
        assert_eq!(book.total_buy_orders(), 0);
    }

    #[test]
    fn stop_orders_rest_inactive() {
        let mut book = book();
        book.add(limit(Side::Sell, "150.00", 100, "CLIENT2"));

        let stop = Order::new(
            "STOP1",
            "AAPL",
            Side::Buy,
            OrderType::Stop,
            "150.00".parse().unwrap(),
            100,
            "CLIENT1",
        );
        let trades = book.add(stop.clone());

        // Accepted but never matched, never laddered.
        assert!(trades.is_empty());
        assert!(book.best_bid().is_none());
        assert_eq!(book.best_ask().unwrap().quantity, 100);
        assert_eq!(book.order(stop.order_id).unwrap().status, OrderStatus::New);
        assert!(!book.cancel(stop.order_id));
    }

    #[test]
    fn cancel_then_cancel_again() {
        let mut book = book();
        let order = limit(Side::Buy, "150.00", 100, "CLIENT1");
        book.add(order.clone());

        assert!(book.cancel(order.order_id));
        assert_eq!(book.total_buy_orders(), 0);
        assert!(!book.cancel(order.order_id));
        assert!(book.best_bid().is_none());
    }

    #[test]
    fn cancel_after_fill_returns_false() {
        let mut book = book();
        let sell = limit(Side::Sell, "150.00", 100, "CLIENT2");
        let buy = limit(Side::Buy, "150.00", 100, "CLIENT1");
        book.add(sell);
        book.add(buy.clone());

        assert!(!book.cancel(buy.order_id));
    }

    #[test]
    fn snapshot_orders_levels_correctly() {
        let mut book = book();
        book.add(limit(Side::Buy, "149.00", 100, "CLIENT1"));
        book.add(limit(Side::Buy, "148.00", 50, "CLIENT2"));
        book.add(limit(Side::Sell, "151.00", 100, "CLIENT3"));
        book.add(limit(Side::Sell, "152.00", 50, "CLIENT4"));

        let snapshot = book.snapshot(5);

        assert_eq!(snapshot.symbol, "AAPL");
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.bids[0].price, "149.00".parse().unwrap());
        assert_eq!(snapshot.bids[0].quantity, 100);
        assert_eq!(snapshot.bids[1].price, "148.00".parse().unwrap());
        assert_eq!(snapshot.asks[0].price, "151.00".parse().unwrap());
        assert_eq!(snapshot.asks[1].price, "152.00".parse().unwrap());
    }

    #[test]
    fn snapshot_caps_levels() {
        let mut book = book();
        for i in 0..5 {
            book.add(limit(Side::Buy, &format!("{}.00", 145 + i), 10, "CLIENT1"));
        }

        let snapshot = book.snapshot(3);
        assert_eq!(snapshot.bids.len(), 3);
        assert_eq!(snapshot.bids[0].price, "149.00".parse().unwrap());
    }

    #[test]
    fn fill_conservation_within_one_call() {
        let mut book = book();
        book.add(limit(Side::Sell, "150.00", 60, "CLIENT2"));
        book.add(limit(Side::Sell, "150.50", 70, "CLIENT3"));

        let buy = limit(Side::Buy, "151.00", 100, "CLIENT1");
        let pre_remaining = buy.remaining_quantity;
        let trades = book.add(buy.clone());

        let filled: u64 = trades.iter().map(|t| t.quantity).sum();
        let post_remaining = book.order(buy.order_id).unwrap().remaining_quantity;
        assert_eq!(pre_remaining, filled + post_remaining);
    }
}
