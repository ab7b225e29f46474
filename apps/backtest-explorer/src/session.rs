//! Interactive exploration session.
//!
//! An [`Explorer`] owns the current filter and display options over a shared
//! dataset, and serves views through a [`ViewCache`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{DisplayConfig, ExplorerConfig};
use crate::dataset::Dataset;
use crate::export::{self, ExportError};
use crate::filter::{FilterSpec, View, ViewCache};
use crate::metrics::{self, CumulativePnlPoint, GroupBy, GroupedMetrics, MetricsResult};
use crate::settings::{self, DisplayOptions, SettingsError};

/// Session state over one dataset.
#[derive(Debug)]
pub struct Explorer {
    dataset: Arc<Dataset>,
    filter: FilterSpec,
    display: DisplayOptions,
    cache: ViewCache,
    display_config: DisplayConfig,
    top_strategies: usize,
    top_symbols: usize,
}

impl Explorer {
    /// Create a session with default display options and no filter.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            filter: FilterSpec::all(),
            display: DisplayOptions::default(),
            cache: ViewCache::default(),
            display_config: DisplayConfig::default(),
            top_strategies: settings::DEFAULT_TOP_STRATEGIES,
            top_symbols: settings::DEFAULT_TOP_SYMBOLS,
        }
    }

    /// Create a session using configured defaults.
    #[must_use]
    pub fn with_config(dataset: Arc<Dataset>, config: &ExplorerConfig) -> Self {
        Self {
            dataset,
            filter: FilterSpec::all(),
            display: config.display.to_options(),
            cache: ViewCache::new(config.cache.capacity),
            display_config: config.display.clone(),
            top_strategies: config.presets.top_strategies,
            top_symbols: config.presets.top_symbols,
        }
    }

    /// The explored dataset.
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Current display options.
    #[must_use]
    pub const fn display(&self) -> &DisplayOptions {
        &self.display
    }

    /// Cache statistics.
    #[must_use]
    pub const fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Replace the filter.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    /// Replace the display options. The row limit is clamped to the
    /// configured bounds.
    pub fn set_display(&mut self, display: DisplayOptions) {
        let max_rows = self.display_config.clamp_rows(display.max_rows);
        self.display = display.with_max_rows(max_rows);
    }

    /// Switch to another dataset. The filter is reconciled against it.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.cache.invalidate(self.dataset.id());
        self.filter = settings::reconcile(&self.filter, &dataset);
        self.dataset = dataset;
    }

    /// Records passing the current filter.
    pub fn view(&mut self) -> View<'_> {
        self.cache.apply(&self.dataset, &self.filter)
    }

    /// Metrics over the current view.
    pub fn metrics(&mut self) -> MetricsResult {
        metrics::compute(&self.view())
    }

    /// Grouped metrics over the current view.
    pub fn grouped(&mut self, group_by: GroupBy) -> GroupedMetrics {
        metrics::compute_grouped(&self.view(), group_by)
    }

    /// Cumulative PNL curve over the current view.
    pub fn cumulative_pnl(&mut self) -> Vec<CumulativePnlPoint> {
        metrics::cumulative_pnl(&self.view())
    }

    /// Current view as CSV, honoring the display options.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the CSV writer fails.
    pub fn to_csv(&mut self) -> Result<String, ExportError> {
        let display = self.display.clone();
        export::to_csv(&self.view(), &display)
    }

    /// Export the current filter and display options.
    #[must_use]
    pub fn export_settings(&self) -> String {
        settings::export(&self.filter, &self.display)
    }

    /// Import a settings document.
    ///
    /// All or nothing: on error the current filter and display options are
    /// left untouched. On success the filter is reconciled against the
    /// dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Malformed`] if the document cannot be decoded.
    pub fn import_settings(&mut self, document: &str) -> Result<(), SettingsError> {
        let (filter, display) = settings::import(document).inspect_err(|e| {
            warn!(error = %e, "Settings import rejected");
        })?;

        self.filter = settings::reconcile(&filter, &self.dataset);
        self.set_display(display);

        info!(
            symbols = self.filter.symbols().len(),
            strategies = self.filter.strategies().len(),
            has_time_bounds = self.filter.has_time_bounds(),
            chart_type = %self.display.chart_type,
            "Settings imported"
        );
        Ok(())
    }

    /// Restrict the filter to the best strategies by total PNL.
    pub fn select_top_strategies(&mut self) {
        let top = settings::top_strategies(&self.dataset, self.top_strategies);
        self.filter = self.filter.clone().with_strategies(top);
    }

    /// Restrict the filter to the best symbols by total PNL.
    pub fn select_top_symbols(&mut self) {
        let top = settings::top_symbols(&self.dataset, self.top_symbols);
        self.filter = self.filter.clone().with_symbols(top);
    }

    /// Restrict the time window to the last `months` calendar months.
    ///
    /// Returns `false` and leaves the filter unchanged if the dataset has
    /// no timestamps.
    pub fn select_last_months(&mut self, months: u32) -> bool {
        let Some((start, end)) = settings::last_months(&self.dataset, months) else {
            return false;
        };
        self.filter = self.filter.clone().with_window(Some(start), Some(end));
        true
    }

    /// Widen the time window to the full dataset period.
    pub fn select_full_period(&mut self) {
        self.filter = self.filter.clone().with_window(None, None);
    }

    /// Drop every restriction.
    pub fn reset_filter(&mut self) {
        self.filter = FilterSpec::all();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::dataset::{DatasetId, TradeRecord};
    use crate::settings::ChartType;

    fn trade(strategy: &str, symbol: &str, pnl: Decimal, day: u32) -> TradeRecord {
        let opened_at: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        TradeRecord {
            id: format!("{strategy}-{day}"),
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
            opened_at: Some(opened_at),
            closed_at: None,
            source: "test.json".to_string(),
        }
    }

    fn explorer() -> Explorer {
        let dataset = Dataset::new(
            DatasetId::new(42),
            vec![
                trade("breakout", "BTC-USDT", dec!(100), 1),
                trade("breakout", "ETH-USDT", dec!(-50), 2),
                trade("reversal", "BTC-USDT", dec!(30), 3),
                trade("scalper", "SOL-USDT", dec!(-10), 4),
            ],
            Default::default(),
        );
        Explorer::new(Arc::new(dataset))
    }

    #[test]
    fn test_view_uses_cache() {
        let mut explorer = explorer();
        assert_eq!(explorer.view().len(), 4);
        assert_eq!(explorer.view().len(), 4);
        assert_eq!(explorer.cache().stats().hits, 1);
        assert_eq!(explorer.cache().stats().misses, 1);
    }

    #[test]
    fn test_metrics_follow_filter() {
        let mut explorer = explorer();
        explorer.set_filter(FilterSpec::all().with_strategies(["breakout"]));
        let metrics = explorer.metrics();
        assert_eq!(metrics.trade_count, 2);
        assert_eq!(metrics.total_pnl, dec!(50));
    }

    #[test]
    fn test_malformed_import_leaves_state_untouched() {
        let mut explorer = explorer();
        let filter = FilterSpec::all().with_symbols(["BTC-USDT"]);
        explorer.set_filter(filter.clone());
        let display = explorer.display().clone();

        let result = explorer.import_settings(r#"{"selected_symbols": 12}"#);

        assert!(matches!(result, Err(SettingsError::Malformed(_))));
        assert_eq!(explorer.filter(), &filter);
        assert_eq!(explorer.display(), &display);
    }

    #[test]
    fn test_import_reconciles_and_clamps() {
        let mut explorer = explorer();
        let doc = r#"{
            "selected_symbols": ["BTC-USDT", "XRP-USDT"],
            "chart_type": "pnl_distribution",
            "max_rows": 5
        }"#;

        let Ok(()) = explorer.import_settings(doc) else {
            panic!("import should succeed");
        };

        assert_eq!(explorer.filter().symbols().len(), 1);
        assert_eq!(explorer.display().chart_type, ChartType::PnlDistribution);
        assert_eq!(explorer.display().max_rows, 10);
        assert_eq!(explorer.view().len(), 2);
    }

    #[test]
    fn test_export_then_import_preserves_session() {
        let mut explorer = explorer();
        explorer.set_filter(FilterSpec::all().with_strategies(["reversal"]));
        let exported = explorer.export_settings();

        let mut other = self::explorer();
        let Ok(()) = other.import_settings(&exported) else {
            panic!("import should succeed");
        };
        assert_eq!(other.filter(), explorer.filter());
        assert_eq!(other.display(), explorer.display());
    }

    #[test]
    fn test_presets() {
        let mut explorer = explorer();
        explorer.select_top_strategies();
        // breakout 50, reversal 30, scalper -10
        assert_eq!(explorer.filter().strategies().len(), 3);

        explorer.reset_filter();
        explorer.select_top_symbols();
        assert_eq!(explorer.filter().symbols().len(), 3);

        explorer.reset_filter();
        assert!(explorer.select_last_months(1));
        assert!(explorer.filter().has_time_bounds());
        explorer.select_full_period();
        assert!(!explorer.filter().has_time_bounds());
    }

    #[test]
    fn test_grouped_and_csv() {
        let mut explorer = explorer();
        let grouped = explorer.grouped(GroupBy::Symbol);
        assert_eq!(grouped.get("BTC-USDT").map(|m| m.total_pnl), Some(dec!(130)));

        let csv = explorer.to_csv().unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert_eq!(explorer.cumulative_pnl().len(), 4);
    }

    #[test]
    fn test_set_dataset_reconciles_filter_and_misses_cache() {
        let mut explorer = explorer();
        let jan_2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        explorer.set_filter(
            FilterSpec::all()
                .with_symbols(["BTC-USDT", "ETH-USDT"])
                .with_window(Some(jan_2), None),
        );
        assert_eq!(explorer.view().len(), 2);

        let replacement = Dataset::new(
            DatasetId::new(43),
            vec![
                trade("breakout", "BTC-USDT", dec!(5), 10),
                trade("reversal", "BTC-USDT", dec!(7), 20),
            ],
            Default::default(),
        );
        explorer.set_dataset(Arc::new(replacement));

        // ETH-USDT is unknown to the new dataset; the start moves to its first trade.
        assert_eq!(explorer.filter().symbols().len(), 1);
        assert!(explorer.filter().symbols().contains("BTC-USDT"));
        assert_eq!(
            explorer.filter().start(),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(explorer.dataset().id(), DatasetId::new(43));

        assert_eq!(explorer.metrics().total_pnl, dec!(12));
        assert_eq!(explorer.cache().stats().misses, 2);
        assert_eq!(explorer.cache().stats().hits, 0);
        // The old dataset's entry is gone.
        assert_eq!(explorer.cache().len(), 1);
    }

    #[test]
    fn test_display_row_limit_follows_configured_bounds() {
        let mut config = ExplorerConfig::default();
        config.display.min_rows_bound = 20;
        config.display.max_rows_bound = 50;
        config.display.max_rows = 30;
        let mut explorer = Explorer::with_config(Arc::clone(explorer().dataset()), &config);
        assert_eq!(explorer.display().max_rows, 30);

        explorer.set_display(DisplayOptions::default().with_max_rows(5));
        assert_eq!(explorer.display().max_rows, 20);
        explorer.set_display(DisplayOptions::default().with_max_rows(500));
        assert_eq!(explorer.display().max_rows, 50);
    }
}
