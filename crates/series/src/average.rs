//! Moving averages computed over a rating series.
//!
//! Both transforms are pure: the output has the same length as the input and
//! depends only on the values and the period.

use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Range;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The kind of moving average drawn by an overlay line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AverageKind {
    /// Exponential moving average.
    #[default]
    #[serde(rename = "EMA")]
    Ema,

    /// Simple moving average.
    #[serde(rename = "SMA")]
    Sma,
}

impl AverageKind {
    /// Applies the average of this kind to `values` with the given `period`.
    ///
    /// A period of zero is treated as one.
    pub fn apply(self, values: &[f64], period: usize) -> Vec<Option<f64>> {
        match self {
            AverageKind::Sma => sma(values, period),
            AverageKind::Ema => ema(values, period).into_iter().map(Some).collect(),
        }
    }

    /// Applies the average independently to every span of `values`.
    ///
    /// Warm-up gaps and seeds restart at the beginning of each span. Indexes
    /// not covered by any span stay `None`.
    pub fn apply_spans(
        self,
        values: &[f64],
        spans: &[Range<usize>],
        period: usize,
    ) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];

        for span in spans {
            let Some(segment) = values.get(span.clone()) else {
                continue;
            };

            let averaged = self.apply(segment, period);
            out[span.clone()].copy_from_slice(&averaged);
        }

        out
    }
}

impl Display for AverageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AverageKind::Ema => f.write_str("EMA"),
            AverageKind::Sma => f.write_str("SMA"),
        }
    }
}

impl FromStr for AverageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMA" => Ok(AverageKind::Ema),
            "SMA" => Ok(AverageKind::Sma),
            other => Err(format!("unknown moving average kind: `{other}`")),
        }
    }
}

/// Computes the simple moving average of `values` over a trailing window of
/// `period` samples.
///
/// The first `period - 1` outputs are `None` because the window is not full.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let period = period.max(1);
    let mut out = Vec::with_capacity(values.len());

    out.extend(std::iter::repeat_n(None, (period - 1).min(values.len())));
    out.extend(
        values
            .windows(period)
            .map(|window| Some(window.iter().sum::<f64>() / period as f64)),
    );

    out
}

/// Computes the exponential moving average of `values`.
///
/// The first output is seeded with the first value and every following one
/// moves towards the sample by `alpha = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (period.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);

    let mut prev = first;
    for &value in rest {
        prev += (value - prev) * alpha;
        out.push(prev);
    }

    out
}

/// Reads a period typed by the user.
///
/// Like a form field parsed as an integer, leading digits are used and the
/// rest is ignored. Anything that does not yield a positive number becomes 1.
pub fn coerce_period(raw: &str) -> usize {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<usize>() {
        Ok(period) if period > 0 && !negative => period,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn sma_leaves_warm_up_gaps() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];

        assert_eq!(
            sma(&values, 3),
            vec![None, None, Some(20.0), Some(30.0), Some(40.0)]
        );
    }

    #[test]
    fn sma_with_period_longer_than_series_is_all_gaps() {
        assert_eq!(sma(&[1.0, 2.0], 5), vec![None, None]);
    }

    #[test]
    fn sma_with_period_one_is_identity() {
        let values = [3.0, 1.5, 7.25];

        assert_eq!(sma(&values, 1), vec![Some(3.0), Some(1.5), Some(7.25)]);
        assert_eq!(sma(&values, 0), vec![Some(3.0), Some(1.5), Some(7.25)]);
    }

    #[test]
    fn ema_is_seeded_with_first_value() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];

        assert_eq!(ema(&values, 3), vec![10.0, 15.0, 22.5, 31.25, 40.625]);
    }

    #[test]
    fn empty_series_yield_empty_averages() {
        assert!(ema(&[], 3).is_empty());
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn apply_spans_restarts_every_span() {
        let values = [10.0, 20.0, 30.0, 100.0, 110.0, 120.0];
        let spans = [0..3, 3..6];

        let averaged = AverageKind::Sma.apply_spans(&values, &spans, 2);

        assert_eq!(
            averaged,
            vec![None, Some(15.0), Some(25.0), None, Some(105.0), Some(115.0)]
        );

        let averaged = AverageKind::Ema.apply_spans(&values, &spans, 3);
        assert_eq!(averaged[3], Some(100.0));
    }

    #[test]
    fn coerce_period_falls_back_to_one() {
        assert_eq!(coerce_period("300"), 300);
        assert_eq!(coerce_period(" 42 "), 42);
        assert_eq!(coerce_period("12.9"), 12);
        assert_eq!(coerce_period("25 games"), 25);
        assert_eq!(coerce_period(""), 1);
        assert_eq!(coerce_period("abc"), 1);
        assert_eq!(coerce_period("0"), 1);
        assert_eq!(coerce_period("-5"), 1);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("ema".parse::<AverageKind>(), Ok(AverageKind::Ema));
        assert_eq!("SMA".parse::<AverageKind>(), Ok(AverageKind::Sma));
        assert!("wma".parse::<AverageKind>().is_err());
    }

    proptest! {
        #[test]
        fn sma_is_the_trailing_window_mean(
            values in prop::collection::vec(-5000.0f64..5000.0, 1..64),
            period in 1usize..16,
        ) {
            prop_assume!(period <= values.len());
            let averaged = sma(&values, period);

            prop_assert_eq!(averaged.len(), values.len());
            for (i, average) in averaged.iter().enumerate() {
                if i < period - 1 {
                    prop_assert!(average.is_none());
                } else {
                    let window = &values[i + 1 - period..=i];
                    let mean = window.iter().sum::<f64>() / period as f64;
                    assert_relative_eq!(average.unwrap(), mean, epsilon = 1e-9);
                }
            }
        }

        #[test]
        fn ema_stays_between_sample_and_previous_average(
            values in prop::collection::vec(-5000.0f64..5000.0, 1..64),
            period in 1usize..32,
        ) {
            let averaged = ema(&values, period);

            prop_assert_eq!(averaged.len(), values.len());
            prop_assert_eq!(averaged[0], values[0]);
            for i in 1..values.len() {
                let lo = values[i].min(averaged[i - 1]);
                let hi = values[i].max(averaged[i - 1]);
                prop_assert!(averaged[i] >= lo - 1e-9 && averaged[i] <= hi + 1e-9);
            }
        }
    }
}
