use chrono::Datelike;

use mrlens_series::time::parse_timestamp;

const LONG_FORMAT: &str = "%Y/%-m/%-d %-H:%M:%S";

/// The X axis label of a match in date mode: `month/day`, in the offset the
/// timestamp was recorded with. Unreadable timestamps are shown as they are.
pub fn short_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(timestamp) => format!("{}/{}", timestamp.month(), timestamp.day()),
        None => raw.to_owned(),
    }
}

/// The tooltip title of a match: the full date and time.
pub fn long_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(timestamp) => timestamp.format(LONG_FORMAT).to_string(),
        None => raw.to_owned(),
    }
}
