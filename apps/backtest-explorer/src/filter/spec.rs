//! Declarative filter specification.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::TradeRecord;

/// Selection criteria over a dataset.
///
/// Values are immutable: every `with_*` method returns a new specification.
/// An empty symbol or strategy set means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    symbols: BTreeSet<String>,
    strategies: BTreeSet<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl FilterSpec {
    /// Specification that passes every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Replace the selected symbols.
    #[must_use]
    pub fn with_symbols<I, S>(self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Replace the selected strategies.
    #[must_use]
    pub fn with_strategies<I, S>(self, strategies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strategies: strategies.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Replace the inclusive lower time bound.
    #[must_use]
    pub fn with_start(self, start: Option<DateTime<Utc>>) -> Self {
        Self { start, ..self }
    }

    /// Replace the inclusive upper time bound.
    #[must_use]
    pub fn with_end(self, end: Option<DateTime<Utc>>) -> Self {
        Self { end, ..self }
    }

    /// Replace both time bounds.
    #[must_use]
    pub fn with_window(self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end, ..self }
    }

    /// Selected symbols (empty = all).
    #[must_use]
    pub const fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    /// Selected strategies (empty = all).
    #[must_use]
    pub const fn strategies(&self) -> &BTreeSet<String> {
        &self.strategies
    }

    /// Inclusive lower bound on opened-at.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Inclusive upper bound on opened-at.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether any time bound is set.
    #[must_use]
    pub const fn has_time_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether the specification passes every record.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.symbols.is_empty() && self.strategies.is_empty() && !self.has_time_bounds()
    }

    /// Evaluate the symbol, strategy and time predicates (logical AND).
    #[must_use]
    pub fn matches(&self, record: &TradeRecord) -> bool {
        self.matches_symbol(record) && self.matches_strategy(record) && self.matches_time(record)
    }

    fn matches_symbol(&self, record: &TradeRecord) -> bool {
        self.symbols.is_empty() || self.symbols.contains(&record.symbol)
    }

    fn matches_strategy(&self, record: &TradeRecord) -> bool {
        self.strategies.is_empty() || self.strategies.contains(&record.strategy_name)
    }

    fn matches_time(&self, record: &TradeRecord) -> bool {
        if !self.has_time_bounds() {
            return true;
        }
        let Some(opened_at) = record.opened_at else {
            return false;
        };
        self.start.is_none_or(|start| start <= opened_at)
            && self.end.is_none_or(|end| opened_at <= end)
    }
}
