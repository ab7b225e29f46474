//! Core types for backtest performance metrics.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::dataset::TradeRecord;

/// Gross profit divided by gross loss, with explicit sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    /// Both gross profit and gross loss are positive.
    Finite(Decimal),
    /// Profits without any loss.
    Infinite,
    /// Neither profit nor loss (includes the empty view).
    Undefined,
}

impl ProfitFactor {
    /// Derive the profit factor from gross figures.
    #[must_use]
    pub fn from_gross(gross_profit: Decimal, gross_loss: Decimal) -> Self {
        if gross_loss > Decimal::ZERO {
            gross_profit
                .checked_div(gross_loss)
                .map_or(Self::Infinite, Self::Finite)
        } else if gross_profit > Decimal::ZERO {
            Self::Infinite
        } else {
            Self::Undefined
        }
    }

    /// Finite value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infinite | Self::Undefined => None,
        }
    }

    /// Float form for charting: `inf` and `NaN` stand in for the sentinels.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Finite(v) => v.to_f64().unwrap_or(f64::NAN),
            Self::Infinite => f64::INFINITY,
            Self::Undefined => f64::NAN,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v:.2}"),
            Self::Infinite => f.write_str("∞"),
            Self::Undefined => f.write_str("N/A"),
        }
    }
}

/// Aggregate statistics over a set of trades.
///
/// Every field is defined for the empty set: counts and sums are zero,
/// ratios without a meaningful value are `None` or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResult {
    // Trade statistics
    /// Number of trades.
    pub trade_count: u64,
    /// Trades with PNL > 0.
    pub winning_trades: u64,
    /// Trades with PNL < 0.
    pub losing_trades: u64,
    /// Winning trades / trade count (decimal, e.g. 0.55 = 55%).
    pub win_rate: Decimal,
    /// Maximum consecutive wins.
    pub max_consecutive_wins: u64,
    /// Maximum consecutive losses.
    pub max_consecutive_losses: u64,

    // PNL
    /// Sum of PNL.
    pub total_pnl: Decimal,
    /// Total PNL / trade count.
    pub avg_pnl: Decimal,
    /// Expected PNL per trade. Same value as `avg_pnl`.
    pub expected_value: Decimal,
    /// Median PNL.
    pub median_pnl: Option<Decimal>,
    /// Population standard deviation of PNL.
    pub pnl_std_dev: Option<Decimal>,
    /// Best single trade.
    pub best_trade: Option<Decimal>,
    /// Worst single trade.
    pub worst_trade: Option<Decimal>,
    /// Mean PNL percentage over trades that report one.
    pub avg_pnl_percentage: Option<Decimal>,

    // Profitability
    /// Sum of positive PNL.
    pub gross_profit: Decimal,
    /// Absolute sum of negative PNL.
    pub gross_loss: Decimal,
    /// Gross profit / gross loss.
    pub profit_factor: ProfitFactor,
    /// Average winning trade.
    pub avg_win: Decimal,
    /// Average losing trade (positive value).
    pub avg_loss: Decimal,
    /// Average PNL / population std-dev of PNL.
    pub sharpe_ratio: Option<Decimal>,

    // Costs and timing
    /// Total fees paid.
    pub total_fees: Decimal,
    /// Average fee per trade.
    pub avg_fee: Decimal,
    /// Mean holding period in seconds over trades that report one.
    pub avg_holding_period: Option<Decimal>,
    /// Median holding period in seconds.
    pub median_holding_period: Option<Decimal>,
}

impl Default for MetricsResult {
    fn default() -> Self {
        Self {
            trade_count: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: Decimal::ZERO,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            total_pnl: Decimal::ZERO,
            avg_pnl: Decimal::ZERO,
            expected_value: Decimal::ZERO,
            median_pnl: None,
            pnl_std_dev: None,
            best_trade: None,
            worst_trade: None,
            avg_pnl_percentage: None,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: ProfitFactor::Undefined,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            sharpe_ratio: None,
            total_fees: Decimal::ZERO,
            avg_fee: Decimal::ZERO,
            avg_holding_period: None,
            median_holding_period: None,
        }
    }
}

/// Dimension for grouped metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One group per strategy name.
    Strategy,
    /// One group per instrument symbol.
    Symbol,
}

impl GroupBy {
    /// Group key of a record.
    #[must_use]
    pub fn key<'r>(&self, record: &'r TradeRecord) -> &'r str {
        match self {
            Self::Strategy => &record.strategy_name,
            Self::Symbol => &record.symbol,
        }
    }
}

/// Metrics of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetrics {
    /// Strategy name or symbol.
    pub key: String,
    /// Metrics over the group's trades.
    pub metrics: MetricsResult,
}

/// Per-group metrics plus the global aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedMetrics {
    /// Grouping dimension.
    pub group_by: GroupBy,
    /// Groups sorted by key.
    pub groups: Vec<GroupMetrics>,
    /// Metrics over all trades.
    pub overall: MetricsResult,
}

impl GroupedMetrics {
    /// Metrics of a single group.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetricsResult> {
        self.groups
            .binary_search_by(|g| g.key.as_str().cmp(key))
            .ok()
            .map(|idx| &self.groups[idx].metrics)
    }

    /// Groups ordered by total PNL descending, ties broken by key ascending.
    #[must_use]
    pub fn ranked_by_total_pnl(&self) -> Vec<&GroupMetrics> {
        let mut ranked: Vec<&GroupMetrics> = self.groups.iter().collect();
        ranked.sort_by(|a, b| {
            b.metrics
                .total_pnl
                .cmp(&a.metrics.total_pnl)
                .then_with(|| a.key.cmp(&b.key))
        });
        ranked
    }
}

/// Point of the cumulative PNL curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePnlPoint {
    /// 1-based position in close order.
    pub trade_number: u64,
    /// Close instant of the trade, if known.
    pub closed_at: Option<DateTime<Utc>>,
    /// PNL of this trade.
    pub pnl: Decimal,
    /// Running total including this trade.
    pub cumulative_pnl: Decimal,
    /// Instrument symbol.
    pub symbol: String,
    /// Strategy name.
    pub strategy_name: String,
}
