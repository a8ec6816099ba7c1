//! Extraction of the rating series embedded in the host page.
//!
//! The host page attaches its chart data as a JSON document shaped as
//! `{"data": {"datasets": [{"label", "yAxisID", "data": [{"x", "y"}]}]}}`.
//! The extractor locates the requested series in it and drops the points
//! without a value.

use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

/// The attribute of the host chart element that carries the chart data.
pub const CHART_DATA_ATTRIBUTE: &str = "data-chartjs-data-value";

/// The series a rating chart can carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Master Rating, the metric of the overlays.
    #[default]
    MatchRating,

    /// League Points, drawn for players below the master rank.
    LeaguePoints,
}

impl SeriesKind {
    /// The label of the series on the host chart.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::MatchRating => "MR",
            SeriesKind::LeaguePoints => "LP",
        }
    }

    fn matches(self, dataset: &HostDataset) -> bool {
        let label = self.label();
        let by_axis = dataset
            .y_axis_id
            .as_deref()
            .is_some_and(|id| id.to_lowercase().contains(&label.to_lowercase()));
        let by_label = dataset.label.as_deref() == Some(label);

        by_axis || by_label
    }
}

#[derive(Debug, Deserialize)]
struct HostChart {
    data: HostChartData,
}

#[derive(Debug, Deserialize)]
struct HostChartData {
    #[serde(default)]
    datasets: Vec<HostDataset>,
}

#[derive(Debug, Deserialize)]
struct HostDataset {
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "yAxisID", default)]
    y_axis_id: Option<String>,
    #[serde(default)]
    data: Vec<RawSeriesPoint>,
}

/// A point of a host series as it is embedded in the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSeriesPoint {
    /// The opaque timestamp of the match.
    pub x: RawTimestamp,
    /// The rating after the match, or `None` when the sample is missing.
    #[serde(default)]
    pub y: Option<f64>,
}

/// A timestamp as found in the host data, either a string or an epoch number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// A date-time string.
    Text(String),
    /// An epoch number.
    Number(Number),
}

impl From<RawTimestamp> for String {
    fn from(timestamp: RawTimestamp) -> String {
        match timestamp {
            RawTimestamp::Text(text) => text,
            RawTimestamp::Number(number) => number.to_string(),
        }
    }
}

/// The values of a series and their timestamps, index-aligned, with the
/// missing samples removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanedSeries {
    values: Vec<f64>,
    timestamps: Vec<String>,
}

impl CleanedSeries {
    /// Builds a series from raw points, dropping every point without a value
    /// together with its timestamp.
    pub fn from_points<I>(points: I) -> CleanedSeries
    where
        I: IntoIterator<Item = RawSeriesPoint>,
    {
        let (values, timestamps) = points
            .into_iter()
            .filter_map(|point| point.y.map(|y| (y, String::from(point.x))))
            .unzip();

        Self { values, timestamps }
    }

    /// Builds a series from `(value, timestamp)` pairs.
    pub fn from_pairs<I, T>(pairs: I) -> CleanedSeries
    where
        I: IntoIterator<Item = (f64, T)>,
        T: Into<String>,
    {
        let (values, timestamps) = pairs.into_iter().map(|(y, x)| (y, x.into())).unzip();

        Self { values, timestamps }
    }

    /// The ratings, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The timestamps, aligned with [`CleanedSeries::values`].
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keeps the points whose timestamp satisfies `predicate`.
    pub fn retain<P>(self, mut predicate: P) -> CleanedSeries
    where
        P: FnMut(&str) -> bool,
    {
        let (values, timestamps) = self
            .values
            .into_iter()
            .zip(self.timestamps)
            .filter(|(_, timestamp)| predicate(timestamp))
            .unzip();

        Self { values, timestamps }
    }
}

/// Reads a rating series out of the host chart data.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesExtractor {
    kind: SeriesKind,
}

impl SeriesExtractor {
    /// Creates an extractor for the given series.
    pub fn new(kind: SeriesKind) -> SeriesExtractor {
        Self { kind }
    }

    /// The series this extractor looks for.
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Extracts the series from the chart data attribute of the host chart.
    ///
    /// Returns `None` when the attribute is absent, cannot be decoded or does
    /// not carry the series. The host page attaches its data after the first
    /// paint, so all of these are expected while it loads.
    pub fn extract(&self, attribute: Option<&str>) -> Option<CleanedSeries> {
        let Some(attribute) = attribute else {
            debug!("the host chart has no data attached yet");
            return None;
        };

        let chart: HostChart = match serde_json::from_str(attribute) {
            Ok(chart) => chart,
            Err(error) => {
                debug!(%error, "the host chart data could not be decoded");
                return None;
            }
        };

        let Some(dataset) = chart
            .data
            .datasets
            .into_iter()
            .find(|dataset| self.kind.matches(dataset))
        else {
            debug!(series = self.kind.label(), "the host chart does not carry the series");
            return None;
        };

        Some(CleanedSeries::from_points(dataset.data))
    }
}
