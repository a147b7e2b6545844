//! Price Trigger Bot - Demo Entry Point
//!
//! Wires the threshold strategy to a paper executor and a synthetic
//! price feed, all driven by `config.toml` (or the path given as the
//! first argument).
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create PaperExecutor (implements ExecutionPort)
//! 4. Create ThresholdStrategy and apply configured thresholds
//! 5. Run each configured auto-buy against a synthetic batch
//! 6. Arm retained buys and run the live loop over a published batch
//! 7. Stop when the feed drains or on SIGINT, then report fills

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use price_trigger_bot::adapters::execution::PaperExecutor;
use price_trigger_bot::adapters::feeds::SyntheticFeed;
use price_trigger_bot::config::{self, AppConfig};
use price_trigger_bot::domain::AutoBuyRequest;
use price_trigger_bot::ports::PriceFeed;
use price_trigger_bot::usecases::ThresholdStrategy;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&path).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.bot.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        thresholds = config.thresholds.len(),
        auto_buy = config.auto_buy.len(),
        armed = config.armed.len(),
        "Starting price trigger bot"
    );

    // ── 3. Execution backend + strategy ─────────────────────
    let executor = Arc::new(PaperExecutor::new());
    let strategy = Arc::new(ThresholdStrategy::new(Arc::clone(&executor)));
    apply_thresholds(&strategy, &config);

    let mut feed =
        SyntheticFeed::from_config(&config.simulation).context("Failed to build synthetic feed")?;

    // ── 4. One-shot auto-buy scenarios ──────────────────────
    for scenario in &config.auto_buy {
        let request =
            AutoBuyRequest::new(scenario.security.clone(), scenario.price_threshold, scenario.volume);
        let updates = feed.batch(config.simulation.updates_per_run);
        if let Err(e) = strategy.auto_buy(&request, updates).await {
            error!(error = %e, security = %request.security, "Auto-buy failed");
        }
    }

    // ── 5. Live loop over armed buys ────────────────────────
    for armed in &config.armed {
        if let Err(e) = strategy.arm(&armed.security, armed.quantity) {
            warn!(error = %e, security = %armed.security, "Could not arm buy");
        }
    }

    if strategy.armed_securities().is_empty() {
        info!("No armed buys, skipping live loop");
    } else {
        run_live(&strategy, feed, config.simulation.updates_per_run).await?;
    }

    // ── 6. Report ───────────────────────────────────────────
    let fills = executor.fills();
    let notional: f64 = fills.iter().map(|fill| fill.notional()).sum();
    info!(fills = fills.len(), notional, "Shutdown complete");
    Ok(())
}

/// Seed the strategy's threshold tables from configuration.
fn apply_thresholds(strategy: &ThresholdStrategy<PaperExecutor>, config: &AppConfig) {
    for threshold in &config.thresholds {
        if let Some(buy) = threshold.buy {
            strategy.set_buy_threshold(&threshold.security, buy);
        }
        if let Some(sell) = threshold.sell {
            strategy.set_sell_threshold(&threshold.security, sell);
        }
    }
}

/// Publish one synthetic batch to the live loop and wait for it to drain.
///
/// SIGINT stops the loop early.
async fn run_live(
    strategy: &Arc<ThresholdStrategy<PaperExecutor>>,
    mut feed: SyntheticFeed,
    updates: usize,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let update_rx = feed.subscribe();

    let loop_strategy = Arc::clone(strategy);
    let mut handle =
        tokio::spawn(async move { loop_strategy.run(update_rx, shutdown_rx).await });

    let published = feed.publish(updates);
    feed.close();
    info!(published, "Synthetic batch published to live loop");

    tokio::select! {
        result = &mut handle => {
            result.context("Strategy task panicked")??;
        }
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
            let _ = shutdown_tx.send(());
            handle.await.context("Strategy task panicked")??;
        }
    }

    for security in strategy.armed_securities() {
        info!(
            security = %security,
            executed = strategy.is_executed(&security).unwrap_or(false),
            "Armed buy status"
        );
    }
    Ok(())
}
