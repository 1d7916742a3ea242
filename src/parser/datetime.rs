//! Publish-time normalization
//!
//! Card timestamps come as ISO 8601 `datetime` attributes. They are rendered
//! as `YYYY-MM-DD HH:MM` in the offset they were published in; anything that
//! does not parse becomes an empty string.

use chrono::{DateTime, NaiveDateTime};

use crate::models::PUBLISH_TIME_FORMAT;

/// Naive layouts accepted after RFC 3339 fails
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw timestamp to `YYYY-MM-DD HH:MM`, or empty
///
/// # Examples
///
/// ```
/// use tcscrape::parser::datetime::normalize_publish_time;
///
/// assert_eq!(normalize_publish_time("2024-12-25T15:45:00Z"), "2024-12-25 15:45");
/// assert_eq!(normalize_publish_time("2024-12-25T15:45:00-08:00"), "2024-12-25 15:45");
/// assert_eq!(normalize_publish_time("2 hours ago"), "");
/// ```
pub fn normalize_publish_time(raw: &str) -> String {
    parse_publish_time(raw)
        .map(|dt| dt.format(PUBLISH_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parse a raw timestamp into wall-clock time at its own offset
pub fn parse_publish_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    // "+0000" style offsets
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
