//! Time utilities.
//!
//! Every instant leaving the server is rendered the same way: ISO-8601 UTC,
//! millisecond precision, `Z` suffix.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serializer;

use crate::core::errors::MockServerError;

/// SQLite's `CURRENT_TIMESTAMP` layout
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the SQLite `YYYY-MM-DD HH:MM:SS` form, which is taken as UTC.
pub fn parse_iso(raw: &str) -> Result<DateTime<Utc>, MockServerError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, SQLITE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| MockServerError::InvalidTimestamp(raw.to_string()))
}

pub fn serialize_iso<S: Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso(instant))
}

pub fn serialize_iso_opt<S: Serializer>(
    instant: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match instant {
        Some(instant) => serialize_iso(instant, serializer),
        None => serializer.serialize_none(),
    }
}
