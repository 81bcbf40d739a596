//! Error taxonomy.
//!
//! Only genuinely exceptional conditions live here. Order validation
//! failures are not errors: the engine reports them as a REJECTED order
//! carrying a human-readable reason, and cancellation misses are a plain
//! `false`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
