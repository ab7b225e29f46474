// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Backtest Explorer - Rust Core Library
//!
//! Loads backtest trade logs, narrows them down with declarative filters and
//! computes trading performance metrics over the result.
//!
//! # Modules (leaves first)
//!
//! - **dataset**: Record normalizer; JSON result documents become an
//!   immutable [`Dataset`] of typed [`TradeRecord`]s plus a report of what was
//!   skipped
//! - **filter**: [`FilterSpec`] values, the pure [`apply`] function and the
//!   [`ViewCache`]
//! - **metrics**: [`compute`] and [`compute_grouped`] over a view
//! - **settings**: settings document export/import and preset filters
//! - **session**: [`Explorer`], the stateful session tying it together
//! - **config** / **telemetry**: YAML configuration and logging setup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use backtest_explorer::{FilterSpec, apply, compute, load_dir};
//!
//! let (dataset, report) = load_dir(Path::new("data"), "json")?;
//! let view = apply(&dataset, &FilterSpec::all().with_symbols(["BTC-USDT"]));
//! let metrics = compute(&view);
//! println!("{} trades, total PNL {}", metrics.trade_count, metrics.total_pnl);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Trade records, datasets and the record normalizer.
pub mod dataset;

/// CSV export of views.
pub mod export;

/// Filter specification, filter engine and view cache.
pub mod filter;

/// Performance metrics.
pub mod metrics;

/// Exploration session.
pub mod session;

/// Settings documents and presets.
pub mod settings;

/// Logging setup.
pub mod telemetry;

pub use config::{ConfigError, ExplorerConfig, load_config};
pub use dataset::{
    Dataset, DatasetId, DocumentError, LoadError, NormalizationReport, Side, SourceDocument,
    TradeRecord, load_dir, normalize,
};
pub use filter::{FilterSpec, View, ViewCache, apply};
pub use metrics::{GroupBy, GroupedMetrics, MetricsResult, ProfitFactor, compute, compute_grouped};
pub use session::Explorer;
pub use settings::{ChartType, DisplayOptions, SettingsError};
