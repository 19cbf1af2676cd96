//! Date and time display formatting
//!
//! Display-only reformatting of server timestamps. Empty or unparseable
//! input yields `""`. No timezone conversion is applied: a timestamp is
//! shown in the offset it was sent with.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const TIME_FORMAT: &str = "%H:%M";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// `2025-01-15T10:30:00Z` or `2025-01-15` → `2025-01-15`
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    parse_date(value)
        .or_else(|| parse_datetime(value).map(|dt| dt.date()))
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `2025-01-15T10:30:00-05:00` → `2025-01-15 10:30`; a bare date is kept as a date
pub fn format_datetime(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Some(dt) = parse_datetime(value) {
        return dt.format(DATETIME_FORMAT).to_string();
    }
    parse_date(value)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `07:45:00` or a full timestamp → `07:45`
pub fn format_time(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .or_else(|| parse_datetime(value).map(|dt| dt.time()))
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}
