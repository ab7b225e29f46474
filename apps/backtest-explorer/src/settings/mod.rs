//! Settings documents and preset filters.
//!
//! A settings document persists a [`FilterSpec`](crate::filter::FilterSpec)
//! together with [`DisplayOptions`]. Dates are RFC 3339 UTC text; bare
//! `YYYY-MM-DD` dates are accepted on import and cover the whole day.

mod codec;
mod error;
mod presets;
mod types;

pub use codec::{export, export_at, import, import_bytes, read_settings_file, write_settings_file};
pub use error::SettingsError;
pub use presets::{
    DEFAULT_TOP_STRATEGIES, DEFAULT_TOP_SYMBOLS, TimeWindow, full_period, last_month, last_months,
    reconcile, top_strategies, top_symbols,
};
pub use types::{
    ChartType, DEFAULT_COLUMNS, DEFAULT_MAX_ROWS, DisplayOptions, MAX_MAX_ROWS, MIN_MAX_ROWS,
    default_columns,
};
