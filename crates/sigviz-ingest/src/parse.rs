//! Cell-level parsing helpers for log rows.
//!
//! Each helper takes the raw cell text and returns `None` (or an error marker)
//! rather than failing, so [`crate::normalize`] can decide what a bad cell
//! means for the whole row.

use chrono::{DateTime, NaiveDateTime};

/// Naive formats tried in order after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Parses a log timestamp.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD HH:MM:SS[.fff]`,
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY/MM/DD HH:MM:SS[.fff]`, and integer Unix
/// epoch milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis = raw.parse::<i64>().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }

    None
}

/// Parses a latitude or longitude in decimal degrees.
///
/// Returns `None` for non-numeric, non-finite, out-of-range (`|value| > limit`)
/// or exactly-zero values; the logger writes `0` before its first GPS fix.
#[must_use]
pub fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value.abs() > limit || value == 0.0 {
        return None;
    }
    Some(value)
}

/// A signal cell that holds text but no number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotANumber;

/// Parses a signal-strength cell.
///
/// Empty cells and non-finite numbers (`NaN`, `inf`) mean "no reading" and
/// yield `Ok(None)`. Any other non-numeric text is an error.
///
/// # Errors
///
/// Returns [`NotANumber`] when the cell is non-empty and not a number.
pub fn parse_signal(raw: &str) -> Result<Option<f64>, NotANumber> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed.parse::<f64>().map_err(|_| NotANumber)?;
    Ok(value.is_finite().then_some(value))
}

/// Trims a free-text cell, mapping blank values to `None`.
#[must_use]
pub fn parse_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
