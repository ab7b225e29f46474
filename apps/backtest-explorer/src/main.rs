//! Backtest Explorer Binary
//!
//! Loads a folder of backtest result documents and logs a performance
//! summary: overall metrics plus the best strategies and symbols.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin backtest-explorer -- [DATA_FOLDER] [SETTINGS_FILE]
//! ```
//!
//! # Environment Variables
//!
//! - `BACKTEST_EXPLORER_CONFIG`: Config file path (default: backtest-explorer.yaml if present)
//! - `RUST_LOG`: Log filter (default: configured level)

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use backtest_explorer::config::{DEFAULT_CONFIG_PATH, ExplorerConfig, load_config};
use backtest_explorer::metrics::{
    GroupBy, format_decimal, format_hours, format_pct, format_profit_factor, format_ratio,
};
use backtest_explorer::session::Explorer;
use backtest_explorer::telemetry::init_logging;
use backtest_explorer::{dataset, settings};
use tracing::{info, warn};

/// Number of groups listed in each ranking.
const RANKING_SIZE: usize = 5;

fn main() -> Result<()> {
    let config = resolve_config()?;
    init_logging(&config.observability.logging);

    let mut args = std::env::args().skip(1);
    let folder = args.next().unwrap_or_else(|| config.data.folder.clone());
    let settings_file = args.next();

    info!(folder = %folder, extension = %config.data.extension, "Loading backtest results");
    let (dataset, report) = dataset::load_dir(Path::new(&folder), &config.data.extension)
        .with_context(|| format!("loading backtest results from '{folder}'"))?;

    if !report.is_clean() {
        warn!(
            documents_failed = report.documents_failed(),
            records_dropped = report.records_dropped(),
            records_flagged = report.records_flagged,
            "Some input could not be used"
        );
    }
    if dataset.is_empty() {
        warn!(folder = %folder, "No trades found");
        return Ok(());
    }

    let mut explorer = Explorer::with_config(Arc::new(dataset), &config);

    if let Some(path) = settings_file {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading settings file '{path}'"))?;
        explorer
            .import_settings(&contents)
            .with_context(|| format!("importing settings from '{path}'"))?;
    }

    let catalog = explorer.dataset();
    info!(
        trades = catalog.len(),
        strategies = catalog.strategies().len(),
        symbols = catalog.symbols().len(),
        timeframes = ?catalog.timeframes(),
        "Dataset loaded"
    );
    if let Some((first, last)) = settings::full_period(catalog) {
        info!(%first, %last, "Trade period");
    }

    let metrics = explorer.metrics();
    info!(
        trades = metrics.trade_count,
        total_pnl = %format_decimal(metrics.total_pnl),
        avg_pnl = %metrics.avg_pnl.round_dp(4),
        win_rate = %format_pct(metrics.win_rate),
        profit_factor = %format_profit_factor(metrics.profit_factor),
        expected_value = %metrics.expected_value.round_dp(4),
        sharpe_ratio = %format_ratio(metrics.sharpe_ratio),
        avg_holding = %format_hours(metrics.avg_holding_period),
        "Overall performance"
    );

    for (rank, group) in explorer
        .grouped(GroupBy::Strategy)
        .ranked_by_total_pnl()
        .into_iter()
        .take(RANKING_SIZE)
        .enumerate()
    {
        info!(
            rank = rank + 1,
            strategy = %group.key,
            total_pnl = %format_decimal(group.metrics.total_pnl),
            trades = group.metrics.trade_count,
            profit_factor = %format_profit_factor(group.metrics.profit_factor),
            expected_value = %group.metrics.expected_value.round_dp(4),
            "Top strategy"
        );
    }

    for (rank, group) in explorer
        .grouped(GroupBy::Symbol)
        .ranked_by_total_pnl()
        .into_iter()
        .take(RANKING_SIZE)
        .enumerate()
    {
        info!(
            rank = rank + 1,
            symbol = %group.key,
            total_pnl = %format_decimal(group.metrics.total_pnl),
            trades = group.metrics.trade_count,
            "Top symbol"
        );
    }

    Ok(())
}

/// Load the config named by `BACKTEST_EXPLORER_CONFIG`, else the default
/// file when present, else built-in defaults.
fn resolve_config() -> Result<ExplorerConfig> {
    match std::env::var("BACKTEST_EXPLORER_CONFIG") {
        Ok(path) if !path.is_empty() => {
            load_config(Some(&path)).with_context(|| format!("loading config '{path}'"))
        }
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(None).context("loading default config")
        }
        _ => Ok(ExplorerConfig::default()),
    }
}
