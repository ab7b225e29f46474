//! Default display options and preset sizes.

use serde::{Deserialize, Serialize};

use crate::settings::{
    ChartType, DEFAULT_MAX_ROWS, DEFAULT_TOP_STRATEGIES, DEFAULT_TOP_SYMBOLS, DisplayOptions,
    MAX_MAX_ROWS, MIN_MAX_ROWS, default_columns,
};

/// Display defaults applied to a fresh session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial chart.
    #[serde(default)]
    pub chart_type: ChartType,
    /// Initial table columns.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    /// Initial row limit.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Smallest allowed row limit.
    #[serde(default = "default_min_rows_bound")]
    pub min_rows_bound: usize,
    /// Largest allowed row limit.
    #[serde(default = "default_max_rows_bound")]
    pub max_rows_bound: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            columns: default_columns(),
            max_rows: default_max_rows(),
            min_rows_bound: default_min_rows_bound(),
            max_rows_bound: default_max_rows_bound(),
        }
    }
}

impl DisplayConfig {
    /// Display options described by this configuration.
    #[must_use]
    pub fn to_options(&self) -> DisplayOptions {
        DisplayOptions {
            chart_type: self.chart_type,
            visible_columns: self.columns.clone(),
            max_rows: self.max_rows,
        }
    }

    /// Clamp a row limit into the configured bounds.
    #[must_use]
    pub fn clamp_rows(&self, rows: usize) -> usize {
        rows.clamp(self.min_rows_bound, self.max_rows_bound)
    }
}

const fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

const fn default_min_rows_bound() -> usize {
    MIN_MAX_ROWS
}

const fn default_max_rows_bound() -> usize {
    MAX_MAX_ROWS
}

/// Sizes of the top-N presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsConfig {
    /// Strategies picked by the top-strategies preset.
    #[serde(default = "default_top_strategies")]
    pub top_strategies: usize,
    /// Symbols picked by the top-symbols preset.
    #[serde(default = "default_top_symbols")]
    pub top_symbols: usize,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            top_strategies: default_top_strategies(),
            top_symbols: default_top_symbols(),
        }
    }
}

const fn default_top_strategies() -> usize {
    DEFAULT_TOP_STRATEGIES
}

const fn default_top_symbols() -> usize {
    DEFAULT_TOP_SYMBOLS
}
