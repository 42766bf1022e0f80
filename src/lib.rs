pub mod cli;
pub mod core;
pub mod providers;
pub mod scheduler;
pub mod store;

use crate::core::config::AppConfig;
use crate::providers::{CoinMarketCapProvider, OpenExchangeRatesProvider};
use crate::scheduler::RefreshScheduler;
use crate::store::PriceStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info};

pub enum AppCommand {
    Run,
    Rates,
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
}

/// Wires both feeds to `store` as described by `config`.
pub fn build_scheduler(config: &AppConfig, store: PriceStore) -> RefreshScheduler {
    let timeout = config.request_timeout();

    let oxr = &config.providers.openexchangerates;
    let rates = OpenExchangeRatesProvider::new(&oxr.base_url, &oxr.app_id, &config.currencies)
        .with_timeout(timeout);
    let crypto =
        CoinMarketCapProvider::new(&config.providers.coinmarketcap.base_url).with_timeout(timeout);

    RefreshScheduler::new(
        store,
        Arc::new(rates),
        Arc::new(crypto),
        config.update_interval(),
    )
    .with_currencies(&config.currencies)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxfeed starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currencies = ?config.currencies,
        interval_ms = config.update_interval_ms,
        "Loaded config"
    );

    let scheduler = build_scheduler(&config, PriceStore::new());

    match command {
        AppCommand::Run => {
            scheduler.run_until(shutdown_signal()).await;
            Ok(())
        }
        AppCommand::Rates => cli::rates::show_rates(&scheduler).await,
        AppCommand::Convert { amount, from, to } => {
            cli::rates::convert(&scheduler, amount, &from, &to).await
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
