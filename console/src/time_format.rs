use crate::error::{ConsoleError, ConsoleResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display pattern for create/update times (`yyyy-MM-dd HH:mm:ss`).
pub const DISPLAY_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

// `%#z` takes `+08`, `+0800` and `+08:00`.
const OFFSET_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

const NAIVE_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

/// Reformats an ISO-8601 timestamp from the backend for display.
///
/// Timestamps carrying an offset keep the wall-clock time of that offset.
/// Date-only values display as midnight.
pub fn format_timestamp(raw: &str) -> ConsoleResult<String> {
    let value = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.format(DISPLAY_PATTERN).to_string());
    }

    for pattern in OFFSET_PATTERNS {
        if let Ok(parsed) = DateTime::parse_from_str(value, pattern) {
            return Ok(parsed.format(DISPLAY_PATTERN).to_string());
        }
    }

    for pattern in NAIVE_PATTERNS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(parsed.format(DISPLAY_PATTERN).to_string());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.format(DISPLAY_PATTERN).to_string());
        }
    }

    Err(ConsoleError::Timestamp {
        value: raw.to_string(),
    })
}
