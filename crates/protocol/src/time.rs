//! Timestamp parsing and formatting
//!
//! Sources emit ISO-8601 in several dialects. Everything is resolved to a UTC
//! instant; naive timestamps (no offset) are taken to be UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::ProtocolError;

/// Offset-carrying formats not covered by RFC 3339 (e.g. Jira's `+0000`)
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Formats without an offset, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp into a UTC instant
///
/// Accepts RFC 3339, offsets without a colon, and naive timestamps with a
/// `T` or space separator and optional fractional seconds.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidTimestamp` if no supported format matches.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ProtocolError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(ProtocolError::invalid_timestamp(value))
}

/// Format an instant as RFC 3339 with microsecond precision and a `Z` suffix
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
