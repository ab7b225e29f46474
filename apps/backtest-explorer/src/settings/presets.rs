//! Preset filters derived from a dataset.

use chrono::{DateTime, Months, Utc};
use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::FilterSpec;
use crate::metrics::{GroupBy, compute_grouped};

/// Default number of strategies picked by the top-strategies preset.
pub const DEFAULT_TOP_STRATEGIES: usize = 3;

/// Default number of symbols picked by the top-symbols preset.
pub const DEFAULT_TOP_SYMBOLS: usize = 5;

/// Inclusive opened-at window.
pub type TimeWindow = (DateTime<Utc>, DateTime<Utc>);

/// The `n` strategies with the highest total PNL, best first.
///
/// Ties are broken by name ascending.
#[must_use]
pub fn top_strategies(dataset: &Dataset, n: usize) -> Vec<String> {
    top_by(dataset, GroupBy::Strategy, n)
}

/// The `n` symbols with the highest total PNL, best first.
///
/// Ties are broken by symbol ascending.
#[must_use]
pub fn top_symbols(dataset: &Dataset, n: usize) -> Vec<String> {
    top_by(dataset, GroupBy::Symbol, n)
}

fn top_by(dataset: &Dataset, group_by: GroupBy, n: usize) -> Vec<String> {
    compute_grouped(dataset.records(), group_by)
        .ranked_by_total_pnl()
        .into_iter()
        .take(n)
        .map(|g| g.key.clone())
        .collect()
}

/// Window ending at the latest opened-at and starting one calendar month
/// earlier. `None` if no record has an opened-at.
#[must_use]
pub fn last_month(dataset: &Dataset) -> Option<TimeWindow> {
    last_months(dataset, 1)
}

/// Window ending at the latest opened-at and starting exactly `months`
/// calendar months earlier, even when that precedes the earliest opened-at.
///
/// A start before the earliest representable instant saturates to it.
#[must_use]
pub fn last_months(dataset: &Dataset, months: u32) -> Option<TimeWindow> {
    let (_, last) = dataset.date_range()?;
    let start = last
        .checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    Some((start, last))
}

/// Window spanning every opened-at of the dataset.
#[must_use]
pub fn full_period(dataset: &Dataset) -> Option<TimeWindow> {
    dataset.date_range()
}

/// Fit an imported filter to a dataset.
///
/// Symbols and strategies absent from the dataset are dropped. Time bounds
/// are clamped to the dataset's opened-at range; a window that ends before
/// it starts is cleared, as are bounds on a dataset without timestamps.
#[must_use]
pub fn reconcile(spec: &FilterSpec, dataset: &Dataset) -> FilterSpec {
    let known_symbols = dataset.symbols();
    let known_strategies = dataset.strategies();

    let symbols: Vec<&String> = spec
        .symbols()
        .iter()
        .filter(|s| known_symbols.binary_search(*s).is_ok())
        .collect();
    let strategies: Vec<&String> = spec
        .strategies()
        .iter()
        .filter(|s| known_strategies.binary_search(*s).is_ok())
        .collect();

    let (start, end) = match dataset.date_range() {
        Some((first, last)) => {
            let clamp = |t: DateTime<Utc>| t.clamp(first, last);
            let start = spec.start().map(clamp);
            let end = spec.end().map(clamp);
            match (start, end) {
                (Some(s), Some(e)) if s > e => (None, None),
                window => window,
            }
        }
        None => (None, None),
    };

    let dropped = spec.symbols().len() - symbols.len() + spec.strategies().len()
        - strategies.len();
    if dropped > 0 {
        debug!(dropped, "Dropped unknown symbols/strategies from filter");
    }

    FilterSpec::all()
        .with_symbols(symbols.into_iter().cloned())
        .with_strategies(strategies.into_iter().cloned())
        .with_window(start, end)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::dataset::{DatasetId, TradeRecord};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn trade(
        strategy: &str,
        symbol: &str,
        pnl: Decimal,
        opened_at: Option<DateTime<Utc>>,
    ) -> TradeRecord {
        TradeRecord {
            id: format!("{strategy}-{symbol}"),
            strategy_name: strategy.to_string(),
            symbol: symbol.to_string(),
            exchange: "bybit".to_string(),
            side: None,
            entry_price: dec!(100),
            exit_price: dec!(100),
            qty: dec!(1),
            fee: Decimal::ZERO,
            size: dec!(100),
            pnl,
            pnl_percentage: None,
            holding_period: None,
            opened_at,
            closed_at: None,
            source: "test.json".to_string(),
        }
    }

    fn dataset(records: Vec<TradeRecord>) -> Dataset {
        Dataset::new(DatasetId::new(7), records, Default::default())
    }

    #[test]
    fn test_top_strategy_picks_highest_total() {
        let ds = dataset(vec![
            trade("a", "BTC-USDT", dec!(10), None),
            trade("b", "BTC-USDT", dec!(30), None),
            trade("c", "BTC-USDT", dec!(20), None),
        ]);
        assert_eq!(top_strategies(&ds, 1), vec!["b".to_string()]);
        assert_eq!(top_strategies(&ds, 5), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_top_symbols_ties_by_name() {
        let ds = dataset(vec![
            trade("a", "SOL-USDT", dec!(5), None),
            trade("a", "ETH-USDT", dec!(5), None),
            trade("a", "BTC-USDT", dec!(-1), None),
        ]);
        assert_eq!(top_symbols(&ds, 2), vec!["ETH-USDT", "SOL-USDT"]);
        assert!(top_symbols(&ds, 0).is_empty());
    }

    #[test]
    fn test_last_month_is_one_calendar_month() {
        let ds = dataset(vec![
            trade("a", "BTC-USDT", dec!(1), Some(ts(2023, 1, 15))),
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 3, 31))),
        ]);
        let Some((start, end)) = last_month(&ds) else {
            panic!("dataset has timestamps");
        };
        assert_eq!(end, ts(2024, 3, 31));
        // March 31 minus one month clamps to the last day of February.
        assert_eq!(start, ts(2024, 2, 29));
    }

    #[test]
    fn test_last_month_may_start_before_first_trade() {
        let ds = dataset(vec![
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 1, 1))),
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 1, 11))),
        ]);
        assert_eq!(last_month(&ds), Some((ts(2023, 12, 11), ts(2024, 1, 11))));
        assert_eq!(last_months(&ds, 6), Some((ts(2023, 7, 11), ts(2024, 1, 11))));
    }

    #[test]
    fn test_last_months_saturates_at_earliest_instant() {
        let ds = dataset(vec![trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 1, 1)))]);
        let Some((start, _)) = last_months(&ds, u32::MAX) else {
            panic!("dataset has timestamps");
        };
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_time_presets_without_timestamps() {
        let ds = dataset(vec![trade("a", "BTC-USDT", dec!(1), None)]);
        assert_eq!(last_month(&ds), None);
        assert_eq!(full_period(&ds), None);
    }

    #[test]
    fn test_reconcile_drops_unknown_and_clamps() {
        let ds = dataset(vec![
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 1, 1))),
            trade("b", "ETH-USDT", dec!(1), Some(ts(2024, 2, 1))),
        ]);
        let spec = FilterSpec::all()
            .with_symbols(["BTC-USDT", "DOGE-USDT"])
            .with_strategies(["ghost"])
            .with_window(Some(ts(2023, 1, 1)), Some(ts(2025, 1, 1)));

        let fitted = reconcile(&spec, &ds);

        assert_eq!(fitted.symbols().len(), 1);
        assert!(fitted.symbols().contains("BTC-USDT"));
        assert!(fitted.strategies().is_empty());
        assert_eq!(fitted.start(), Some(ts(2024, 1, 1)));
        assert_eq!(fitted.end(), Some(ts(2024, 2, 1)));
    }

    #[test]
    fn test_reconcile_clears_inverted_window() {
        let ds = dataset(vec![
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 1, 1))),
            trade("a", "BTC-USDT", dec!(1), Some(ts(2024, 2, 1))),
        ]);
        let spec = FilterSpec::all().with_window(Some(ts(2024, 1, 20)), Some(ts(2024, 1, 10)));
        let fitted = reconcile(&spec, &ds);
        assert!(!fitted.has_time_bounds());
    }
}
