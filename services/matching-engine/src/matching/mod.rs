//! Price-time priority matching logic.

pub mod crossing;
