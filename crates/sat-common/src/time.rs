//! Payload timestamp formatting.

use chrono::{DateTime, Utc};

/// ISO 8601 with millisecond precision and no zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Format a timestamp the way payloads and storage keys expect it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
