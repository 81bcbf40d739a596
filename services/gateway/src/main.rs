//! Mock trading exchange gateway.
//!
//! Single process wiring the matching engine, the market data publisher,
//! and the two network adapters: order entry over HTTP and market data
//! over WebSocket, on separate ports. A scheduled tick drives snapshot and
//! quote publication; trades are published at execution time from the
//! submit path.

mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use clap::Parser;
use config::ExchangeConfig;
use market_data::MarketDataPublisher;
use matching_engine::MatchingEngine;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", default_value_t = String::from("./config/exchange.toml"))]
    config: String,
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = ExchangeConfig::load(&args.config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

async fn run(config: ExchangeConfig) -> Result<(), anyhow::Error> {
    info!(
        sender_comp_id = %config.sender_comp_id,
        target_comp_id = %config.target_comp_id,
        symbols = ?config.symbols,
        "starting mock trading exchange gateway"
    );

    let config = Arc::new(config);
    let engine = Arc::new(MatchingEngine::new(
        config.symbols.clone(),
        config.max_depth_levels,
        config.verbose_matching,
    ));
    let publisher = Arc::new(MarketDataPublisher::new(
        engine.clone(),
        config.publish_interval(),
    ));

    // Periodic snapshot/quote publication; aborted on shutdown.
    let publisher_task = tokio::spawn(publisher.clone().run());

    let state = AppState {
        engine,
        publisher,
        config: config.clone(),
    };

    let order_entry_listener =
        TcpListener::bind(("0.0.0.0", config.order_entry_port)).await?;
    let market_data_listener =
        TcpListener::bind(("0.0.0.0", config.market_data_port)).await?;
    info!(port = config.order_entry_port, "order entry listening");
    info!(port = config.market_data_port, "market data listening");

    let order_entry_server =
        axum::serve(order_entry_listener, router::order_entry_router(state.clone()))
            .with_graceful_shutdown(shutdown_signal());
    let market_data_server =
        axum::serve(market_data_listener, router::market_data_router(state))
            .with_graceful_shutdown(shutdown_signal());

    let (order_entry_result, market_data_result) = tokio::join!(
        async { order_entry_server.await },
        async { market_data_server.await },
    );
    publisher_task.abort();
    order_entry_result?;
    market_data_result?;

    info!("mock trading exchange gateway stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
