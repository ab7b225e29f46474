//! JSON settings documents.
//!
//! Exported documents look like:
//!
//! ```json
//! {
//!   "selected_symbols": ["BTC-USDT"],
//!   "selected_strategies": [],
//!   "start_date": "2024-01-01T00:00:00Z",
//!   "end_date": null,
//!   "chart_type": "cumulative_pnl",
//!   "show_columns": ["symbol", "PNL"],
//!   "max_rows": 100,
//!   "export_timestamp": "2024-06-01T12:00:00Z"
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::filter::FilterSpec;

use super::error::SettingsError;
use super::types::{ChartType, DEFAULT_MAX_ROWS, DisplayOptions, default_columns};

/// Fields of a settings document as read. Absent and `null` fields are `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    selected_symbols: Option<Vec<String>>,
    selected_strategies: Option<Vec<String>>,
    start_date: Option<String>,
    end_date: Option<String>,
    chart_type: Option<ChartType>,
    show_columns: Option<Vec<String>>,
    max_rows: Option<usize>,
}

/// UTC instants whose year needs a sign or more than four digits, as
/// written by [`format_instant`]; RFC 3339 parsing rejects these.
const EXTENDED_YEAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

#[derive(Debug, Clone, Copy)]
enum DayEdge {
    Start,
    End,
}

/// Export a filter and display options as a JSON settings document.
#[must_use]
pub fn export(spec: &FilterSpec, display: &DisplayOptions) -> String {
    export_at(spec, display, Utc::now())
}

/// Export with an explicit export timestamp.
#[must_use]
pub fn export_at(
    spec: &FilterSpec,
    display: &DisplayOptions,
    exported_at: DateTime<Utc>,
) -> String {
    let document = json!({
        "selected_symbols": spec.symbols(),
        "selected_strategies": spec.strategies(),
        "start_date": spec.start().map(format_instant),
        "end_date": spec.end().map(format_instant),
        "chart_type": display.chart_type,
        "show_columns": display.visible_columns,
        "max_rows": display.max_rows,
        "export_timestamp": format_instant(exported_at),
    });
    format!("{document:#}")
}

/// Import a settings document.
///
/// Missing or `null` fields take their defaults; unknown fields and
/// `export_timestamp` are ignored.
///
/// # Errors
///
/// Returns [`SettingsError::Malformed`] if the input is not JSON, not an
/// object, a present field has the wrong type, or a date cannot be parsed.
pub fn import(document: &str) -> Result<(FilterSpec, DisplayOptions), SettingsError> {
    let value: Value =
        serde_json::from_str(document).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    import_value(value)
}

/// Import a settings document from raw bytes.
///
/// # Errors
///
/// Same as [`import`].
pub fn import_bytes(document: &[u8]) -> Result<(FilterSpec, DisplayOptions), SettingsError> {
    let value: Value =
        serde_json::from_slice(document).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    import_value(value)
}

/// Read and import a settings file.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the file cannot be read, otherwise the
/// errors of [`import`].
pub fn read_settings_file(
    path: impl AsRef<Path>,
) -> Result<(FilterSpec, DisplayOptions), SettingsError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_bytes(&bytes)
}

/// Export settings into a file, replacing its contents.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] if the file cannot be written.
pub fn write_settings_file(
    path: impl AsRef<Path>,
    spec: &FilterSpec,
    display: &DisplayOptions,
) -> Result<(), SettingsError> {
    let path = path.as_ref();
    std::fs::write(path, export(spec, display)).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn import_value(value: Value) -> Result<(FilterSpec, DisplayOptions), SettingsError> {
    if !value.is_object() {
        return Err(SettingsError::Malformed(
            "settings document must be a JSON object".to_string(),
        ));
    }
    let raw: RawSettings =
        serde_json::from_value(value).map_err(|e| SettingsError::Malformed(e.to_string()))?;

    let start = parse_bound("start_date", raw.start_date.as_deref(), DayEdge::Start)?;
    let end = parse_bound("end_date", raw.end_date.as_deref(), DayEdge::End)?;

    let spec = FilterSpec::all()
        .with_symbols(raw.selected_symbols.unwrap_or_default())
        .with_strategies(raw.selected_strategies.unwrap_or_default())
        .with_window(start, end);

    let display = DisplayOptions {
        chart_type: raw.chart_type.unwrap_or_default(),
        visible_columns: raw.show_columns.unwrap_or_else(default_columns),
        max_rows: raw.max_rows.unwrap_or(DEFAULT_MAX_ROWS),
    };

    Ok((spec, display))
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` date.
///
/// Instants outside years 0000..=9999 are accepted in the extended
/// `+YYYYY-MM-DDTHH:MM:SSZ` form that export writes for them.
///
/// A bare date covers the whole day: it maps to the first millisecond of
/// the day for a start bound and the last millisecond for an end bound.
fn parse_bound(
    field: &'static str,
    text: Option<&str>,
    edge: DayEdge,
) -> Result<Option<DateTime<Utc>>, SettingsError> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, EXTENDED_YEAR_FORMAT) {
        return Ok(Some(naive.and_utc()));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
        SettingsError::Malformed(format!("{field}: cannot parse '{text}' as a date: {e}"))
    })?;
    let naive = match edge {
        DayEdge::Start => date.and_hms_milli_opt(0, 0, 0, 0),
        DayEdge::End => date.and_hms_milli_opt(23, 59, 59, 999),
    };
    naive
        .map(|n| Some(n.and_utc()))
        .ok_or_else(|| SettingsError::Malformed(format!("{field}: '{text}' is out of range")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};
    use proptest::prelude::*;

    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_export_writes_all_fields() {
        let spec = FilterSpec::all()
            .with_symbols(["BTC-USDT"])
            .with_start(Some(ts(2024, 1, 1, 0, 0, 0)));
        let display = DisplayOptions::default().with_chart_type(ChartType::CumulativePnl);

        let text = export_at(&spec, &display, ts(2024, 6, 1, 12, 0, 0));
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["selected_symbols"], json!(["BTC-USDT"]));
        assert_eq!(value["selected_strategies"], json!([]));
        assert_eq!(value["start_date"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(value["end_date"], Value::Null);
        assert_eq!(value["chart_type"], json!("cumulative_pnl"));
        assert_eq!(value["max_rows"], json!(100));
        assert_eq!(value["export_timestamp"], json!("2024-06-01T12:00:00Z"));
    }

    #[test]
    fn test_import_empty_object_gives_defaults() {
        let (spec, display) = import("{}").unwrap();
        assert!(spec.is_pass_through());
        assert_eq!(display, DisplayOptions::default());
    }

    #[test]
    fn test_import_nulls_give_defaults() {
        let doc = r#"{"selected_symbols": null, "start_date": null, "chart_type": null, "max_rows": null}"#;
        let (spec, display) = import(doc).unwrap();
        assert!(spec.is_pass_through());
        assert_eq!(display, DisplayOptions::default());
    }

    #[test]
    fn test_import_ignores_unknown_fields_and_timestamp() {
        let doc = r#"{"max_rows": 250, "export_timestamp": "garbage", "theme": "dark"}"#;
        let (_, display) = import(doc).unwrap();
        assert_eq!(display.max_rows, 250);
    }

    #[test]
    fn test_import_bare_dates_cover_whole_day() {
        let doc = r#"{"start_date": "2024-01-01", "end_date": "2024-01-31"}"#;
        let (spec, _) = import(doc).unwrap();

        assert_eq!(spec.start(), Some(ts(2024, 1, 1, 0, 0, 0)));
        let Some(end) = spec.end() else {
            panic!("end bound should be set");
        };
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_import_rfc3339_with_offset_normalizes_to_utc() {
        let doc = r#"{"start_date": "2024-01-01T03:00:00+03:00"}"#;
        let (spec, _) = import(doc).unwrap();
        assert_eq!(spec.start(), Some(ts(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_import_legacy_chart_label() {
        let doc = r#"{"chart_type": "PNL по времени"}"#;
        let (_, display) = import(doc).unwrap();
        assert_eq!(display.chart_type, ChartType::PnlTimeline);
    }

    #[test]
    fn test_import_rejects_malformed_documents() {
        for doc in [
            "not json",
            "[1, 2, 3]",
            r#"{"selected_symbols": "BTC-USDT"}"#,
            r#"{"max_rows": "many"}"#,
            r#"{"max_rows": -5}"#,
            r#"{"start_date": "yesterday"}"#,
            r#"{"chart_type": "pie"}"#,
        ] {
            let Err(err) = import(doc) else {
                panic!("expected '{doc}' to be rejected");
            };
            assert!(matches!(err, SettingsError::Malformed(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let spec = FilterSpec::all().with_strategies(["breakout"]);
        let display = DisplayOptions::default().with_max_rows(500);

        write_settings_file(&path, &spec, &display).unwrap();
        let (read_spec, read_display) = read_settings_file(&path).unwrap();

        assert_eq!(read_spec, spec);
        assert_eq!(read_display, display);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_settings_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_extended_year_instants_round_trip() {
        // Years 11476 and -249.
        for millis in [300_000_000_000_000_i64, -70_000_000_000_000] {
            let instant = DateTime::from_timestamp_millis(millis).unwrap();
            let spec = FilterSpec::all().with_window(Some(instant), Some(instant));

            let text = export(&spec, &DisplayOptions::default());
            let (imported, _) = import(&text).unwrap();

            assert_eq!(imported, spec, "{text}");
        }
    }

    #[test]
    fn test_import_extended_year_text() {
        let doc = r#"{
            "start_date": "-0249-10-22T10:13:20Z",
            "end_date": "+11476-10-15T05:20:00.5Z"
        }"#;
        let (spec, _) = import(doc).unwrap();

        assert_eq!(spec.start(), Some(ts(-249, 10, 22, 10, 13, 20)));
        let Some(end) = spec.end() else {
            panic!("end bound should be set");
        };
        assert_eq!(end.timestamp_subsec_millis(), 500);
        assert_eq!(end.with_nanosecond(0), Some(ts(11476, 10, 15, 5, 20, 0)));
    }

    fn instant() -> impl Strategy<Value = Option<DateTime<Utc>>> {
        // Whole representable range with nanosecond precision.
        let secs = DateTime::<Utc>::MIN_UTC.timestamp()..=DateTime::<Utc>::MAX_UTC.timestamp();
        proptest::option::of(
            (secs, 0u32..1_000_000_000)
                .prop_filter_map("representable", |(s, n)| DateTime::from_timestamp(s, n)),
        )
    }

    proptest! {
        #[test]
        fn prop_export_then_import_is_identity(
            symbols in proptest::collection::btree_set("[A-Z]{2,5}-USDT", 0..4),
            strategies in proptest::collection::btree_set("[a-z_]{1,12}", 0..4),
            start in instant(),
            end in instant(),
            chart in proptest::sample::select(ChartType::ALL.to_vec()),
            columns in proptest::collection::vec("[A-Za-z_]{1,16}", 0..6),
            max_rows in 10usize..=1000,
        ) {
            let spec = FilterSpec::all()
                .with_symbols(symbols)
                .with_strategies(strategies)
                .with_window(start, end);
            let display = DisplayOptions::default()
                .with_chart_type(chart)
                .with_columns(columns)
                .with_max_rows(max_rows);

            let (spec2, display2) = import(&export(&spec, &display)).unwrap();
            prop_assert_eq!(spec2, spec);
            prop_assert_eq!(display2, display);
        }
    }
}
