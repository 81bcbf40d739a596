//! Shared value objects for the mock trading exchange.
//!
//! Everything here is plain data: orders and trades are immutable values
//! whose lifecycle transitions produce new values, identifiers come from
//! process-wide atomic sequences, and prices are exact decimals.

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod time;
pub mod trade;

pub use errors::ExchangeError;
pub use ids::{OrderId, TradeId};
pub use numeric::Price;
pub use order::{Order, OrderStatus, OrderType, Side};
pub use trade::Trade;
