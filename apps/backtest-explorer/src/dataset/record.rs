//! Typed trade records and the normalized dataset.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::constants::SECONDS_PER_HOUR;

/// Position side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Long position.
    Long,
    /// Short position.
    Short,
}

impl Side {
    /// Parse a side from its source representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Some(Self::Long),
            "short" | "sell" => Some(Self::Short),
            _ => None,
        }
    }

    /// Get the side name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One closed backtest trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Trade identifier (unique within its source document only).
    pub id: String,
    /// Strategy that produced the trade.
    pub strategy_name: String,
    /// Instrument symbol, e.g. `BTC-USDT`.
    pub symbol: String,
    /// Venue the backtest simulated.
    pub exchange: String,
    /// Position side, if the source named a recognizable one.
    pub side: Option<Side>,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    pub exit_price: Decimal,
    /// Quantity traded.
    pub qty: Decimal,
    /// Fee paid.
    pub fee: Decimal,
    /// Position size.
    pub size: Decimal,
    /// Absolute profit/loss.
    pub pnl: Decimal,
    /// Profit/loss in percent, when present.
    pub pnl_percentage: Option<Decimal>,
    /// Holding period in seconds, when present.
    pub holding_period: Option<Decimal>,
    /// Position open instant.
    pub opened_at: Option<DateTime<Utc>>,
    /// Position close instant.
    pub closed_at: Option<DateTime<Utc>>,
    /// Name of the source document the record came from.
    pub source: String,
}

impl TradeRecord {
    /// Check if this trade was profitable.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// Check if this trade lost money.
    #[must_use]
    pub fn is_loser(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    /// Whether the record can take part in time-filtered queries.
    #[must_use]
    pub const fn is_time_filterable(&self) -> bool {
        self.opened_at.is_some()
    }

    /// Holding period in hours.
    #[must_use]
    pub fn holding_period_hours(&self) -> Option<Decimal> {
        self.holding_period.map(|secs| secs / SECONDS_PER_HOUR)
    }
}

/// Content fingerprint of the source documents a dataset was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(u64);

impl DatasetId {
    /// Wrap a raw fingerprint.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw fingerprint value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Normalized, merged collection of trade records.
///
/// A dataset is read-only once built; share it behind an `Arc` when several
/// sessions explore the same data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    id: DatasetId,
    records: Vec<TradeRecord>,
    timeframes: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset from already-typed records.
    #[must_use]
    pub const fn new(
        id: DatasetId,
        records: Vec<TradeRecord>,
        timeframes: BTreeSet<String>,
    ) -> Self {
        Self {
            id,
            records,
            timeframes,
        }
    }

    /// Identity used for cache keys.
    #[must_use]
    pub const fn id(&self) -> DatasetId {
        self.id
    }

    /// All records in load order.
    #[must_use]
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Timeframes the backtests considered. Informational only.
    #[must_use]
    pub const fn timeframes(&self) -> &BTreeSet<String> {
        &self.timeframes
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique symbols.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self.records.iter().map(|r| r.symbol.as_str()).collect();
        unique.into_iter().map(str::to_string).collect()
    }

    /// Sorted unique strategy names.
    #[must_use]
    pub fn strategies(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .records
            .iter()
            .map(|r| r.strategy_name.as_str())
            .collect();
        unique.into_iter().map(str::to_string).collect()
    }

    /// Earliest and latest opened-at instants of time-filterable records.
    #[must_use]
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut opened = self.records.iter().filter_map(|r| r.opened_at);
        let first = opened.next()?;
        Some(opened.fold((first, first), |(min, max), t| (min.min(t), max.max(t))))
    }
}
