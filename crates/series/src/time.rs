//! Parsing of the timestamp strings attached to series points.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

const MICROS_THRESHOLD: f64 = 1e15;
const MILLIS_THRESHOLD: f64 = 1e12;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a timestamp string of a series point.
///
/// Accepts RFC 3339 date-times, ISO date-times with or without an offset,
/// dates, and Unix epochs in seconds, milliseconds or microseconds. Values
/// without an offset are taken as UTC. Returns `None` when nothing matches.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return parse_epoch(raw);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(timestamp) = DateTime::parse_from_str(raw, format) {
            return Some(timestamp);
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.and_utc().fixed_offset());
        }
    }

    raw.get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc().fixed_offset())
}

fn parse_epoch(raw: &str) -> Option<DateTime<FixedOffset>> {
    let value: f64 = raw.parse().ok()?;

    let millis = if value >= MICROS_THRESHOLD {
        value / 1_000.0
    } else if value >= MILLIS_THRESHOLD {
        value
    } else {
        value * 1_000.0
    };

    DateTime::from_timestamp_millis(millis as i64).map(|timestamp| timestamp.fixed_offset())
}
