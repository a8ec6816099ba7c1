//! Date range filtering of cleaned series.

use chrono::NaiveDate;

use crate::extract::CleanedSeries;
use crate::time::parse_timestamp;

/// An inclusive range of calendar dates used to narrow a series down to the
/// matches played within it. Open ends are unbounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from the optional first and last days.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Returns `true` when neither end is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub(crate) fn by_date(&self, date: NaiveDate) -> bool {
        match (self.from, self.to) {
            (None, None) => true,
            (None, Some(ref to)) => date.le(to),
            (Some(ref from), None) => date.ge(from),
            (Some(ref from), Some(ref to)) => date.ge(from) && date.le(to),
        }
    }

    /// Returns `true` when the timestamp falls within the range. Timestamps
    /// that cannot be parsed are always kept.
    pub fn contains(&self, timestamp: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }

        match parse_timestamp(timestamp) {
            Some(timestamp) => self.by_date(timestamp.date_naive()),
            None => true,
        }
    }

    /// Keeps the points of `series` whose timestamp is within the range.
    pub fn apply(&self, series: CleanedSeries) -> CleanedSeries {
        if self.is_unbounded() {
            return series;
        }

        series.retain(|timestamp| self.contains(timestamp))
    }
}
