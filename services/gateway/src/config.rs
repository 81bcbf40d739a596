//! Exchange configuration.
//!
//! Loaded once at startup from a TOML file and read-only afterwards. A
//! missing file falls back to the built-in defaults with a warning; a file
//! that exists but does not parse is an operator error and fails startup.

use exchange_types::ExchangeError;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Order-entry listen port.
    pub order_entry_port: u16,
    /// Market-data (WebSocket) listen port.
    pub market_data_port: u16,
    /// Snapshot/quote publication interval in milliseconds.
    pub publish_interval_ms: u64,
    /// Symbol universe. Accepts a TOML list or a comma-separated string.
    #[serde(deserialize_with = "deserialize_symbols")]
    pub symbols: Vec<String>,
    /// Depth levels per side in published snapshots.
    pub max_depth_levels: usize,
    /// Log every processed order and executed trade.
    pub verbose_matching: bool,
    /// Tokio worker threads.
    pub worker_threads: usize,
    /// WebSocket heartbeat interval in milliseconds.
    pub heartbeat_interval_ms: u64,
    /// Identity this exchange reports as.
    pub sender_comp_id: String,
    /// Counterparty identity expected on order-entry sessions.
    pub target_comp_id: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            order_entry_port: 5001,
            market_data_port: 5002,
            publish_interval_ms: 100,
            symbols: default_symbols(),
            max_depth_levels: 10,
            verbose_matching: true,
            worker_threads: 4,
            heartbeat_interval_ms: 30_000,
            sender_comp_id: "EXCHANGE".to_string(),
            target_comp_id: "CLIENT".to_string(),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &str) -> Result<Self, ExchangeError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(%path, %err, "config file not readable, using defaults");
                return Ok(Self::default());
            }
        };
        toml::from_str(&contents)
            .map_err(|err| ExchangeError::Config(format!("{path}: {err}")))
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "TSLA"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn deserialize_symbols<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SymbolUniverse {
        List(Vec<String>),
        Csv(String),
    }

    let symbols = match SymbolUniverse::deserialize(deserializer)? {
        SymbolUniverse::List(list) => list,
        SymbolUniverse::Csv(csv) => csv
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    };
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = ExchangeConfig::default();
        assert_eq!(config.order_entry_port, 5001);
        assert_eq!(config.market_data_port, 5002);
        assert_eq!(config.publish_interval_ms, 100);
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "GOOGL", "TSLA"]);
        assert_eq!(config.max_depth_levels, 10);
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.heartbeat_interval_ms, 30_000);
        assert_eq!(config.sender_comp_id, "EXCHANGE");
        assert_eq!(config.target_comp_id, "CLIENT");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: ExchangeConfig = toml::from_str(
            r#"
            order_entry_port = 6001
            symbols = ["AAPL", "NVDA"]
            "#,
        )
        .unwrap();
        assert_eq!(config.order_entry_port, 6001);
        assert_eq!(config.symbols, vec!["AAPL", "NVDA"]);
        assert_eq!(config.market_data_port, 5002);
    }

    #[test]
    fn symbols_accept_comma_separated_string() {
        let config: ExchangeConfig =
            toml::from_str(r#"symbols = "AAPL, MSFT,TSLA""#).unwrap();
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = ExchangeConfig::load("/nonexistent/exchange.toml").unwrap();
        assert_eq!(config.order_entry_port, 5001);
    }
}
