//! Order book infrastructure: price levels, the two side ladders, and the
//! per-symbol book.

pub mod ask_book;
pub mod bid_book;
pub mod order_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use order_book::{OrderBook, OrderBookSnapshot};
pub use price_level::PriceLevel;

use exchange_types::Price;
use serde::{Deserialize, Serialize};

/// One aggregated price level as exposed to market data: the price and the
/// total remaining quantity of every order resting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub quantity: u64,
}
