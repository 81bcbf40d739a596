use crate::config::ExchangeConfig;
use market_data::MarketDataPublisher;
use matching_engine::MatchingEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub publisher: Arc<MarketDataPublisher>,
    pub config: Arc<ExchangeConfig>,
}
