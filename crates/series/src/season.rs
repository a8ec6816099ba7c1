use std::ops::Range;

/// Splits a rating series into seasons.
///
/// A new season starts wherever two consecutive values differ by at least
/// `threshold`, which is how a rating reset between seasons shows up in the
/// match history. The returned spans cover the whole series without gaps.
pub fn split_seasons(values: &[f64], threshold: f64) -> Vec<Range<usize>> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut start = 0;

    for (i, pair) in values.windows(2).enumerate() {
        if (pair[1] - pair[0]).abs() >= threshold {
            spans.push(start..i + 1);
            start = i + 1;
        }
    }

    spans.push(start..values.len());
    spans
}
