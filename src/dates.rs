//! Event dates arrive as ISO-8601 strings and are kept as naive UTC.

use super::errors::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// RFC 3339 requires seconds; ISO-8601 lets them be dropped.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Accepts a bare date (midnight), a naive datetime with `T` or space as the
/// separator, or an RFC 3339 timestamp with an offset, which is shifted to
/// UTC. Surrounding whitespace is an error.
pub fn parse_iso(raw: &str) -> Result<NaiveDateTime, ApiError> {
    let invalid = || {
        ApiError::Validation(format!(
            "Invalid datetime format: invalid isoformat string: '{raw}'"
        ))
    };
    if raw.trim() != raw {
        return Err(invalid());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// An empty string means "no date".
pub fn parse_optional(
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => parse_iso(s).map(Some),
    }
}

pub fn check_range(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(), ApiError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ApiError::Validation(
            "event_end_date must be >= event_start_date".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Mirrors the usual ISO rendering: microseconds only when they are non-zero.
pub fn to_iso(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
