//! CSV export of filtered views.

use std::borrow::Cow;
use std::string::FromUtf8Error;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{Terminator, WriterBuilder};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::dataset::TradeRecord;
use crate::filter::View;
use crate::settings::DisplayOptions;

/// Errors raised while rendering CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV writer failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered output is not UTF-8.
    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Column of the trade table, named as in the source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Trade identifier.
    Id,
    /// Strategy name.
    StrategyName,
    /// Instrument symbol.
    Symbol,
    /// Venue.
    Exchange,
    /// Position side.
    Side,
    /// Entry price.
    EntryPrice,
    /// Exit price.
    ExitPrice,
    /// Quantity.
    Qty,
    /// Fee.
    Fee,
    /// Position size.
    Size,
    /// Absolute PNL.
    Pnl,
    /// PNL percentage.
    PnlPercentage,
    /// Holding period in seconds.
    HoldingPeriod,
    /// Open instant.
    OpenedAt,
    /// Close instant.
    ClosedAt,
    /// Source document name.
    Source,
}

impl Column {
    /// Resolve a column by its source name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let column = match name {
            "id" => Self::Id,
            "strategy_name" => Self::StrategyName,
            "symbol" => Self::Symbol,
            "exchange" => Self::Exchange,
            "type" => Self::Side,
            "entry_price" => Self::EntryPrice,
            "exit_price" => Self::ExitPrice,
            "qty" => Self::Qty,
            "fee" => Self::Fee,
            "size" => Self::Size,
            "PNL" => Self::Pnl,
            "PNL_percentage" => Self::PnlPercentage,
            "holding_period" => Self::HoldingPeriod,
            "opened_at" => Self::OpenedAt,
            "closed_at" => Self::ClosedAt,
            "file_name" | "source" => Self::Source,
            _ => return None,
        };
        Some(column)
    }

    /// Source name of the column.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::StrategyName => "strategy_name",
            Self::Symbol => "symbol",
            Self::Exchange => "exchange",
            Self::Side => "type",
            Self::EntryPrice => "entry_price",
            Self::ExitPrice => "exit_price",
            Self::Qty => "qty",
            Self::Fee => "fee",
            Self::Size => "size",
            Self::Pnl => "PNL",
            Self::PnlPercentage => "PNL_percentage",
            Self::HoldingPeriod => "holding_period",
            Self::OpenedAt => "opened_at",
            Self::ClosedAt => "closed_at",
            Self::Source => "file_name",
        }
    }

    fn value<'r>(&self, trade: &'r TradeRecord) -> Cow<'r, str> {
        match self {
            Self::Id => Cow::Borrowed(&trade.id),
            Self::StrategyName => Cow::Borrowed(&trade.strategy_name),
            Self::Symbol => Cow::Borrowed(&trade.symbol),
            Self::Exchange => Cow::Borrowed(&trade.exchange),
            Self::Side => Cow::Borrowed(trade.side.map_or("", |s| s.as_str())),
            Self::EntryPrice => Cow::Owned(trade.entry_price.to_string()),
            Self::ExitPrice => Cow::Owned(trade.exit_price.to_string()),
            Self::Qty => Cow::Owned(trade.qty.to_string()),
            Self::Fee => Cow::Owned(trade.fee.to_string()),
            Self::Size => Cow::Owned(trade.size.to_string()),
            Self::Pnl => Cow::Owned(trade.pnl.to_string()),
            Self::PnlPercentage => optional_decimal(trade.pnl_percentage),
            Self::HoldingPeriod => optional_decimal(trade.holding_period),
            Self::OpenedAt => optional_instant(trade.opened_at),
            Self::ClosedAt => optional_instant(trade.closed_at),
            Self::Source => Cow::Borrowed(&trade.source),
        }
    }
}

fn optional_decimal(value: Option<Decimal>) -> Cow<'static, str> {
    value.map_or(Cow::Borrowed(""), |v| Cow::Owned(v.to_string()))
}

fn optional_instant(value: Option<DateTime<Utc>>) -> Cow<'static, str> {
    value.map_or(Cow::Borrowed(""), |t| {
        Cow::Owned(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    })
}

/// Render the first `max_rows` records of a view as CSV.
///
/// Only the visible columns are written, in their display order, and fields
/// are quoted where needed. Column names that match no record field are
/// skipped; with no known column the output is empty.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV writer fails.
pub fn to_csv(view: &View<'_>, display: &DisplayOptions) -> Result<String, ExportError> {
    let columns: Vec<Column> = display
        .visible_columns
        .iter()
        .filter_map(|name| Column::parse(name))
        .collect();
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(Column::name))?;
    for trade in view.iter().take(display.max_rows) {
        writer.write_record(columns.iter().map(|column| column.value(trade).into_owned()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
