//! Time-related utilities for chat timestamps.
//!
//! Timestamps travel as Unix epoch milliseconds. Backends that serialize a
//! zone-less local date-time string are also accepted, see [`parse_timestamp_str`].

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// Display format for a message time (locale-independent clock time).
const TIME_FORMAT: &str = "%H:%M:%S";

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as a clock time in the local time zone.
///
/// Returns `None` when the timestamp is out of chrono's representable range.
pub fn timestamp_to_local_time(timestamp_millis: i64) -> Option<String> {
    let offset = Local
        .timestamp_millis_opt(timestamp_millis)
        .single()?
        .offset()
        .fix();
    timestamp_to_time_with_offset(timestamp_millis, &offset)
}

/// Format a Unix timestamp (milliseconds) as a clock time under a fixed offset.
pub fn timestamp_to_time_with_offset(
    timestamp_millis: i64,
    offset: &FixedOffset,
) -> Option<String> {
    let dt = offset.timestamp_millis_opt(timestamp_millis).single()?;
    Some(dt.format(TIME_FORMAT).to_string())
}

/// Parse a textual timestamp into Unix milliseconds.
///
/// Accepted shapes:
///
/// * RFC 3339 with offset, e.g. `2024-03-01T10:15:30.250+09:00`
/// * zone-less ISO-8601 local date-time, e.g. `2024-03-01T10:15:30.250`,
///   interpreted in the local time zone
/// * a bare integer string of epoch milliseconds
pub fn parse_timestamp_str(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(millis) = value.parse::<i64>() {
        return Some(millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}
