//! Formatting utilities for performance metrics display.

use rust_decimal::Decimal;

use super::constants::{HUNDRED, SECONDS_PER_HOUR};
use super::types::ProfitFactor;

/// Format a decimal as percentage string.
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", value.saturating_mul(HUNDRED))
}

/// Format a decimal with 2 decimal places.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Format an optional decimal ratio.
#[must_use]
pub fn format_ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// Format a profit factor, rendering its sentinels.
#[must_use]
pub fn format_profit_factor(value: ProfitFactor) -> String {
    value.to_string()
}

/// Format a duration in seconds as hours.
#[must_use]
pub fn format_hours(seconds: Option<Decimal>) -> String {
    seconds.map_or_else(|| "N/A".to_string(), |s| format!("{:.1}h", s / SECONDS_PER_HOUR))
}
