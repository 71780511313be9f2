//! Punch timestamp parsing and display.
//!
//! The backend reports `InAt` either as RFC 3339 or as
//! `yyyy-MM-dd'T'HH:mm:ss[.fff]Z` with a compact `+hhmm` offset. Offsets are
//! honoured; a timestamp without any offset is read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::constants::{
    HUMAN_TIMESTAMP_FORMAT, PUNCH_TIMESTAMP_FORMAT, PUNCH_TIMESTAMP_NAIVE_FORMAT,
};

/// Parse an `InAt` value into an absolute instant.
///
/// # Errors
///
/// Returns a description of the rejected value when none of the accepted
/// layouts match.
pub fn parse_punch_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty punch timestamp".to_string());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, PUNCH_TIMESTAMP_FORMAT) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // No offset at all: read as UTC. Trailing text fails to parse.
    NaiveDateTime::parse_from_str(trimmed, PUNCH_TIMESTAMP_NAIVE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("unrecognised punch timestamp '{trimmed}': {err}"))
}

/// Render an instant as `MMM dd, yyyy h:mm a` in the given zone, or UTC.
pub fn format_human(instant: DateTime<Utc>, zone: Option<Tz>) -> String {
    match zone {
        Some(tz) => instant.with_timezone(&tz).format(HUMAN_TIMESTAMP_FORMAT).to_string(),
        None => instant.format(HUMAN_TIMESTAMP_FORMAT).to_string(),
    }
}
