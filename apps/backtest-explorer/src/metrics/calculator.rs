//! Performance calculator for filtered backtest trades.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::math::{mean, median, population_std_dev, saturating_sum};
use super::types::{
    CumulativePnlPoint, GroupBy, GroupMetrics, GroupedMetrics, MetricsResult, ProfitFactor,
};
use crate::dataset::TradeRecord;

/// Performance calculator over borrowed trade records.
#[derive(Debug, Default)]
pub struct PerformanceCalculator<'a> {
    trades: Vec<&'a TradeRecord>,
}

impl<'a> PerformanceCalculator<'a> {
    /// Create an empty calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self { trades: Vec::new() }
    }

    /// Create a calculator over a sequence of records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = &'a TradeRecord>) -> Self {
        Self {
            trades: records.into_iter().collect(),
        }
    }

    /// Add a completed trade.
    pub fn add_trade(&mut self, trade: &'a TradeRecord) {
        self.trades.push(trade);
    }

    /// Get all trades.
    #[must_use]
    pub fn trades(&self) -> &[&'a TradeRecord] {
        &self.trades
    }

    /// Calculate all performance metrics.
    #[must_use]
    pub fn calculate(&self) -> MetricsResult {
        if self.trades.is_empty() {
            return MetricsResult::default();
        }

        let pnls: Vec<Decimal> = self.trades.iter().map(|t| t.pnl).collect();
        let trade_count = pnls.len() as u64;
        let count = Decimal::from(trade_count);

        let total_pnl = saturating_sum(pnls.iter().copied());
        let avg_pnl = total_pnl / count;

        let (gross_profit, gross_loss, winning_trades, losing_trades) =
            self.calculate_trade_stats();
        let win_rate = Decimal::from(winning_trades) / count;

        let avg_win = if winning_trades > 0 {
            gross_profit / Decimal::from(winning_trades)
        } else {
            Decimal::ZERO
        };

        let avg_loss = if losing_trades > 0 {
            gross_loss / Decimal::from(losing_trades)
        } else {
            Decimal::ZERO
        };

        let pnl_std_dev = population_std_dev(&pnls);
        let sharpe_ratio = Self::calculate_sharpe(avg_pnl, trade_count, pnl_std_dev);

        let (max_consecutive_wins, max_consecutive_losses) = self.calculate_consecutive_streaks();

        let total_fees = saturating_sum(self.trades.iter().map(|t| t.fee));

        let pnl_percentages: Vec<Decimal> =
            self.trades.iter().filter_map(|t| t.pnl_percentage).collect();
        let holding_periods: Vec<Decimal> =
            self.trades.iter().filter_map(|t| t.holding_period).collect();

        MetricsResult {
            trade_count,
            winning_trades,
            losing_trades,
            win_rate,
            max_consecutive_wins,
            max_consecutive_losses,
            total_pnl,
            avg_pnl,
            expected_value: avg_pnl,
            median_pnl: median(&pnls),
            pnl_std_dev,
            best_trade: pnls.iter().max().copied(),
            worst_trade: pnls.iter().min().copied(),
            avg_pnl_percentage: mean(&pnl_percentages),
            gross_profit,
            gross_loss,
            profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
            avg_win,
            avg_loss,
            sharpe_ratio,
            total_fees,
            avg_fee: total_fees / count,
            avg_holding_period: mean(&holding_periods),
            median_holding_period: median(&holding_periods),
        }
    }

    /// PNL of exactly zero counts as neither a win nor a loss. Sums
    /// saturate at the `Decimal` range.
    fn calculate_trade_stats(&self) -> (Decimal, Decimal, u64, u64) {
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut winning = 0u64;
        let mut losing = 0u64;

        for trade in &self.trades {
            if trade.is_winner() {
                gross_profit = gross_profit.saturating_add(trade.pnl);
                winning += 1;
            } else if trade.is_loser() {
                gross_loss = gross_loss.saturating_add(trade.pnl.abs());
                losing += 1;
            }
        }

        (gross_profit, gross_loss, winning, losing)
    }

    fn calculate_consecutive_streaks(&self) -> (u64, u64) {
        let mut max_wins = 0u64;
        let mut max_losses = 0u64;
        let mut current_wins = 0u64;
        let mut current_losses = 0u64;

        for trade in &self.trades {
            if trade.is_winner() {
                current_wins += 1;
                current_losses = 0;
                max_wins = max_wins.max(current_wins);
            } else if trade.is_loser() {
                current_losses += 1;
                current_wins = 0;
                max_losses = max_losses.max(current_losses);
            }
        }

        (max_wins, max_losses)
    }

    /// Sharpe = Mean PNL / population StdDev(PNL).
    fn calculate_sharpe(
        avg_pnl: Decimal,
        trade_count: u64,
        std_dev: Option<Decimal>,
    ) -> Option<Decimal> {
        if trade_count < 2 {
            return None;
        }
        let std = std_dev?;
        if std == Decimal::ZERO {
            return None;
        }
        avg_pnl.checked_div(std)
    }

    /// Running PNL total in close order.
    ///
    /// Trades without a close instant come last; ties keep input order.
    #[must_use]
    pub fn cumulative_pnl(&self) -> Vec<CumulativePnlPoint> {
        let mut ordered = self.trades.clone();
        ordered.sort_by_key(|t| (t.closed_at.is_none(), t.closed_at));

        let mut running = Decimal::ZERO;
        ordered
            .into_iter()
            .zip(1u64..)
            .map(|(trade, trade_number)| {
                running = running.saturating_add(trade.pnl);
                CumulativePnlPoint {
                    trade_number,
                    closed_at: trade.closed_at,
                    pnl: trade.pnl,
                    cumulative_pnl: running,
                    symbol: trade.symbol.clone(),
                    strategy_name: trade.strategy_name.clone(),
                }
            })
            .collect()
    }
}

/// Compute metrics over a view (or any sequence of records).
///
/// Never fails: the empty sequence yields [`MetricsResult::default`].
#[must_use]
pub fn compute<'a>(records: impl IntoIterator<Item = &'a TradeRecord>) -> MetricsResult {
    PerformanceCalculator::from_records(records).calculate()
}

/// Compute metrics per strategy or per symbol, plus the overall aggregate.
///
/// Every record lands in exactly one group, keyed by its own field value.
#[must_use]
pub fn compute_grouped<'a>(
    records: impl IntoIterator<Item = &'a TradeRecord>,
    group_by: GroupBy,
) -> GroupedMetrics {
    let overall = PerformanceCalculator::from_records(records);

    let mut buckets: BTreeMap<&str, PerformanceCalculator<'a>> = BTreeMap::new();
    for &trade in overall.trades() {
        buckets
            .entry(group_by.key(trade))
            .or_default()
            .add_trade(trade);
    }

    let groups = buckets
        .into_iter()
        .map(|(key, calculator)| GroupMetrics {
            key: key.to_string(),
            metrics: calculator.calculate(),
        })
        .collect();

    GroupedMetrics {
        group_by,
        groups,
        overall: overall.calculate(),
    }
}

/// Cumulative PNL curve over a view (or any sequence of records).
#[must_use]
pub fn cumulative_pnl<'a>(
    records: impl IntoIterator<Item = &'a TradeRecord>,
) -> Vec<CumulativePnlPoint> {
    PerformanceCalculator::from_records(records).cumulative_pnl()
}
