//! Bid (buy-side) ladder.
//!
//! Price levels keyed by price in a `BTreeMap`; the best bid is the highest
//! price, so iteration runs in reverse. Empty levels are removed on the
//! spot so the map never holds dead entries.

use exchange_types::{Order, Price};
use std::collections::BTreeMap;

use super::price_level::PriceLevel;
use super::BookLevel;

#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Append an order to the queue at its price.
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().push_back(order);
    }

    /// Remove an order from its price level. Returns false if it was not
    /// resting there.
    pub fn remove(&mut self, order: &Order) -> bool {
        let Some(level) = self.levels.get_mut(&order.price) else {
            return false;
        };
        let removed = level.remove(order.order_id).is_some();
        if level.is_empty() {
            self.levels.remove(&order.price);
        }
        removed
    }

    /// Highest resting bid price.
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Best bid with its aggregate quantity.
    pub fn best(&self) -> Option<BookLevel> {
        self.levels.iter().next_back().map(|(price, level)| BookLevel {
            price: *price,
            quantity: level.total_quantity(),
        })
    }

    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub(crate) fn remove_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    /// Top `max_levels` aggregated levels, best (highest) first.
    pub fn depth(&self, max_levels: usize) -> Vec<BookLevel> {
        self.levels
            .iter()
            .rev()
            .take(max_levels)
            .map(|(price, level)| BookLevel {
                price: *price,
                quantity: level.total_quantity(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
