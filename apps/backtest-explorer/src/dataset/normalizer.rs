//! Record normalizer: raw JSON trade logs in, typed dataset out.
//!
//! Untyped data never leaves this module. Every trade entry is coerced into a
//! [`TradeRecord`] or dropped; every document is either merged into the
//! dataset or listed as a failure in the report.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::error::DocumentError;
use super::record::{Dataset, DatasetId, Side, TradeRecord};
use super::report::{DocumentFailure, DroppedRecord, NormalizationReport};

const TRADES_FIELD: &str = "trades";
const TIMEFRAMES_FIELD: &str = "considering_timeframes";

/// A raw trade-log document handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Display name, usually the file name.
    pub name: String,
    /// Raw JSON bytes.
    pub contents: Vec<u8>,
}

impl SourceDocument {
    /// Create a new source document.
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Normalize a batch of documents into one dataset.
///
/// Trades are concatenated in document order. Malformed documents and
/// uncoercible trades are skipped and reported, never raised.
#[must_use]
pub fn normalize(documents: &[SourceDocument]) -> (Dataset, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let mut records = Vec::new();
    let mut timeframes = BTreeSet::new();

    for document in documents {
        let (trades, document_timeframes) = match parse_document(&document.contents) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(document = %document.name, %error, "Skipping malformed document");
                report.document_failures.push(DocumentFailure {
                    document: document.name.clone(),
                    error,
                });
                continue;
            }
        };

        report.documents_loaded += 1;
        timeframes.extend(document_timeframes);

        for (index, raw) in trades.iter().enumerate() {
            report.records_read += 1;
            match coerce_trade(raw, &document.name) {
                Ok(record) => {
                    if !record.is_time_filterable() {
                        report.records_flagged += 1;
                    }
                    records.push(record);
                }
                Err(field) => {
                    debug!(document = %document.name, index, field, "Dropping trade");
                    report.dropped.push(DroppedRecord {
                        document: document.name.clone(),
                        index,
                        field: field.to_string(),
                    });
                }
            }
        }
    }

    report.records_kept = records.len();

    let dataset = Dataset::new(fingerprint(documents), records, timeframes);

    info!(
        dataset_id = %dataset.id(),
        documents_loaded = report.documents_loaded,
        documents_failed = report.documents_failed(),
        records_read = report.records_read,
        records_kept = report.records_kept,
        records_dropped = report.records_dropped(),
        records_flagged = report.records_flagged,
        "Normalized backtest documents"
    );

    (dataset, report)
}

/// Fingerprint of the document names and bytes, in order.
#[must_use]
pub fn fingerprint(documents: &[SourceDocument]) -> DatasetId {
    let mut hasher = DefaultHasher::new();
    documents.len().hash(&mut hasher);
    for document in documents {
        document.name.hash(&mut hasher);
        document.contents.hash(&mut hasher);
    }
    DatasetId::new(hasher.finish())
}

fn parse_document(contents: &[u8]) -> Result<(Vec<Value>, Vec<String>), DocumentError> {
    let value: Value = serde_json::from_slice(contents)
        .map_err(|e| DocumentError::InvalidJson(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(DocumentError::NotAnObject);
    };

    let trades = match object.remove(TRADES_FIELD) {
        Some(Value::Array(trades)) => trades,
        Some(_) => return Err(DocumentError::NotAnArray(TRADES_FIELD.to_string())),
        None => return Err(DocumentError::MissingTrades),
    };

    let timeframes = match object.remove(TIMEFRAMES_FIELD) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(DocumentError::NotAnArray(TIMEFRAMES_FIELD.to_string())),
    };

    Ok((trades, timeframes))
}

/// Coerce one raw trade; `Err` names the first field that failed.
fn coerce_trade(raw: &Value, source: &str) -> Result<TradeRecord, &'static str> {
    let Value::Object(fields) = raw else {
        return Err("trade");
    };

    let mut opened_at = optional_instant(fields, "opened_at");
    let mut closed_at = optional_instant(fields, "closed_at");
    if let (Some(opened), Some(closed)) = (opened_at, closed_at) {
        if closed < opened {
            opened_at = None;
            closed_at = None;
        }
    }

    Ok(TradeRecord {
        id: text(fields, "id"),
        strategy_name: text(fields, "strategy_name"),
        symbol: text(fields, "symbol"),
        exchange: text(fields, "exchange"),
        side: fields.get("type").and_then(Value::as_str).and_then(Side::parse),
        entry_price: required_decimal(fields, "entry_price")?,
        exit_price: required_decimal(fields, "exit_price")?,
        qty: required_decimal(fields, "qty")?,
        fee: required_decimal(fields, "fee")?,
        size: required_decimal(fields, "size")?,
        pnl: required_decimal(fields, "PNL")?,
        pnl_percentage: fields.get("PNL_percentage").and_then(to_decimal),
        holding_period: fields.get("holding_period").and_then(to_decimal),
        opened_at,
        closed_at,
        source: source.to_string(),
    })
}

fn text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn required_decimal(
    fields: &Map<String, Value>,
    key: &'static str,
) -> Result<Decimal, &'static str> {
    fields.get(key).and_then(to_decimal).ok_or(key)
}

/// Numbers and numeric strings coerce; anything else is rejected.
fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

fn optional_instant(fields: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let millis = match fields.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    epoch_millis_to_instant(millis)
}

/// Convert fractional epoch milliseconds, keeping microsecond precision.
fn epoch_millis_to_instant(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let micros = (millis * 1_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}
