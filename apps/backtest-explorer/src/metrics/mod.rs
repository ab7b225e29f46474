//! Performance metrics over filtered backtest trades.
//!
//! Implements the dashboard's trading statistics:
//! - Total/average/median PNL and expected value
//! - Win rate (PNL of exactly zero is neither a win nor a loss)
//! - Profit factor (gross profit / gross loss) with explicit sentinels
//! - Sharpe ratio (mean PNL / population standard deviation of PNL)
//! - Holding period, fee and streak statistics
//! - Per-strategy and per-symbol breakdowns and the cumulative PNL curve

mod calculator;
pub(crate) mod constants;
mod format;
mod math;
mod types;

pub use calculator::{PerformanceCalculator, compute, compute_grouped, cumulative_pnl};
pub use format::{format_decimal, format_hours, format_pct, format_profit_factor, format_ratio};
pub use types::{
    CumulativePnlPoint, GroupBy, GroupMetrics, GroupedMetrics, MetricsResult, ProfitFactor,
};
