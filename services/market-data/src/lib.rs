//! Market data distribution for the mock trading exchange.
//!
//! Derives depth snapshots and quotes from the matching engine on a
//! periodic tick, publishes trades at execution time, and fans everything
//! out to WebSocket subscribers as JSON envelopes. Slow subscribers miss
//! frames instead of stalling the publisher.

pub mod events;
pub mod publisher;

pub use events::{EventType, MarketDataMessage};
pub use publisher::{MarketDataPublisher, SubscriberState};
