//! Display options carried alongside a filter in a settings document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of table rows shown.
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Smallest selectable number of table rows.
pub const MIN_MAX_ROWS: usize = 10;

/// Largest selectable number of table rows.
pub const MAX_MAX_ROWS: usize = 1000;

/// Columns shown when a settings document names none.
pub const DEFAULT_COLUMNS: [&str; 9] = [
    "symbol",
    "strategy_name",
    "type",
    "entry_price",
    "exit_price",
    "PNL",
    "PNL_percentage",
    "holding_period",
    "opened_at",
];

/// Chart selected in the dashboard.
///
/// Legacy documents stored the chart by its localized label; those labels
/// are accepted on import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// PNL of each trade as bars.
    #[default]
    #[serde(alias = "PNL по сделкам")]
    PnlByTrade,
    /// Running PNL total in close order.
    #[serde(alias = "Накопленный PNL")]
    CumulativePnl,
    /// PNL against the open instant.
    #[serde(alias = "PNL по времени")]
    PnlTimeline,
    /// Histogram of PNL.
    #[serde(alias = "Распределение PNL")]
    PnlDistribution,
}

impl ChartType {
    /// All chart types in menu order.
    pub const ALL: [Self; 4] = [
        Self::PnlByTrade,
        Self::CumulativePnl,
        Self::PnlTimeline,
        Self::PnlDistribution,
    ];

    /// Get the chart type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PnlByTrade => "pnl_by_trade",
            Self::CumulativePnl => "cumulative_pnl",
            Self::PnlTimeline => "pnl_timeline",
            Self::PnlDistribution => "pnl_distribution",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation settings that do not affect which records are selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Selected chart.
    pub chart_type: ChartType,
    /// Table columns in display order.
    pub visible_columns: Vec<String>,
    /// Maximum number of table rows.
    pub max_rows: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            visible_columns: default_columns(),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl DisplayOptions {
    /// Replace the chart type.
    #[must_use]
    pub fn with_chart_type(self, chart_type: ChartType) -> Self {
        Self { chart_type, ..self }
    }

    /// Replace the visible columns.
    #[must_use]
    pub fn with_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible_columns: columns.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Replace the row limit.
    #[must_use]
    pub fn with_max_rows(self, max_rows: usize) -> Self {
        Self { max_rows, ..self }
    }
}

/// Owned copy of [`DEFAULT_COLUMNS`].
#[must_use]
pub fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| (*c).to_string()).collect()
}
