//! Acquisition timestamp handling.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{StacError, StacResult};

/// Normalize a metadata timestamp to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Accepts `T` or space as the date/time separator, optional fractional
/// seconds (dropped, not rounded) and an optional trailing `Z`.
pub fn normalize_datetime(raw: &str) -> StacResult<String> {
    let trimmed = raw.trim().trim_end_matches('Z');
    let whole_seconds = trimmed.split('.').next().unwrap_or(trimmed);

    let parsed = NaiveDateTime::parse_from_str(whole_seconds, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(whole_seconds, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| StacError::MalformedMetadata(format!("invalid timestamp '{}'", raw)))?;

    Ok(parsed.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Parse a compact `YYYYMMDD` acquisition day.
pub fn acquisition_day(compact: &str) -> Option<NaiveDate> {
    if compact.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(compact, "%Y%m%d").ok()
}
