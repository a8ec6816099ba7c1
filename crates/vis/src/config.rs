//! Assembly of the chart specification from a rating series and the overlay
//! lines.

mod labels;

use std::ops::Range;

use mrlens_series::CleanedSeries;
use mrlens_series::LineConfig;
use mrlens_series::OverlaySettings;
use mrlens_series::XAxisMode;
use mrlens_series::settings::LINE_COUNT;
use mrlens_series::split_seasons;

use crate::chart::ChartData;
use crate::chart::ChartKind;
use crate::chart::ChartOptions;
use crate::chart::ChartSpec;
use crate::chart::DataPoint;
use crate::chart::Dataset;
use crate::chart::Font;
use crate::chart::Grid;
use crate::chart::Legend;
use crate::chart::LegendLabels;
use crate::chart::Plugins;
use crate::chart::Position;
use crate::chart::Scales;
use crate::chart::TickOptions;
use crate::chart::Tooltip;
use crate::chart::XAxis;
use crate::chart::YAxis;
use crate::chart::axes::AxisType;
use crate::chart::axes::ValueRange;
use crate::chart::axes::Y_STEP;
use crate::chart::axes::fix_last_tick;
use crate::chart::axes::linear_ticks;

pub use crate::config::labels::long_label;
pub use crate::config::labels::short_label;

/// The color each overlay line is drawn with, by slot.
pub const LINE_COLORS: [&str; LINE_COUNT] = ["#ff6384", "#36a2eb", "#4bc0c0"];

const RAW_COLOR: &str = "rgba(255,255,255,0.15)";
const RAW_ORDER: i32 = 10;
const TICK_COLOR: &str = "#aaa";
const X_GRID_COLOR: &str = "#333";
const LEGEND_COLOR: &str = "#fff";

const DATE_MAX_TICKS: usize = 20;
const SEQUENCE_MAX_TICKS: usize = 10;

/// Builds the [`ChartSpec`] of the overlay chart.
///
/// The raw series is always the first dataset, drawn faintly behind the
/// overlays. Every enabled line follows in slot order, labelled like
/// `EMA(300)`.
#[derive(Debug, Clone)]
pub struct ChartConfigBuilder<'a> {
    series: &'a CleanedSeries,
    lines: [LineConfig; LINE_COUNT],
    x_axis_mode: XAxisMode,
    raw_label: String,
    hide_raw: bool,
    season_threshold: Option<f64>,
}

impl<'a> ChartConfigBuilder<'a> {
    /// Creates a builder over `series` with the default overlay settings.
    pub fn new(series: &'a CleanedSeries) -> ChartConfigBuilder<'a> {
        let settings = OverlaySettings::default();

        Self {
            series,
            lines: settings.lines,
            x_axis_mode: settings.x_axis_mode,
            raw_label: String::from("Raw MR"),
            hide_raw: false,
            season_threshold: None,
        }
    }

    /// Takes the lines and the X axis mode from `settings`.
    pub fn settings(self, settings: &OverlaySettings) -> Self {
        self.lines(settings.lines).x_axis_mode(settings.x_axis_mode)
    }

    /// Sets the overlay lines.
    pub fn lines(mut self, lines: [LineConfig; LINE_COUNT]) -> Self {
        self.lines = lines;
        self
    }

    /// Sets the X axis mode.
    pub fn x_axis_mode(mut self, mode: XAxisMode) -> Self {
        self.x_axis_mode = mode;
        self
    }

    /// Sets the legend label of the raw series.
    pub fn raw_label(mut self, label: impl Into<String>) -> Self {
        self.raw_label = label.into();
        self
    }

    /// Hides the raw series. Its dataset stays first in the legend but does
    /// not count towards the Y axis range.
    pub fn hide_raw(mut self, hide: bool) -> Self {
        self.hide_raw = hide;
        self
    }

    /// Computes the overlays separately for every season, splitting the
    /// series where consecutive values jump by at least `threshold`.
    pub fn season_threshold(mut self, threshold: Option<f64>) -> Self {
        self.season_threshold = threshold;
        self
    }

    /// Builds the chart specification.
    pub fn build(&self) -> ChartSpec {
        let datasets = self.datasets();

        let primary = self.primary_axis(&datasets);
        let secondary = secondary_axis(&primary);

        ChartSpec {
            kind: ChartKind::Line,
            data: ChartData { datasets },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                scales: Scales {
                    x: self.x_axis(),
                    y: primary,
                    y2: secondary,
                },
                plugins: self.plugins(),
            },
        }
    }

    fn datasets(&self) -> Vec<Dataset> {
        let values = self.series.values();
        let spans = self.spans();

        let raw = Dataset {
            label: self.raw_label.clone(),
            data: self.points(values.iter().copied().map(Some)),
            border_color: RAW_COLOR.to_owned(),
            border_width: 1.0,
            point_radius: 1.0,
            tension: None,
            order: Some(RAW_ORDER),
            hidden: self.hide_raw.then_some(true),
        };

        let overlays = self
            .lines
            .iter()
            .zip(LINE_COLORS)
            .filter(|(line, _)| line.enabled)
            .map(|(line, color)| Dataset {
                label: line.label(),
                data: self.points(line.kind.apply_spans(values, &spans, line.period)),
                border_color: color.to_owned(),
                border_width: 2.0,
                point_radius: 0.0,
                tension: Some(0.2),
                order: None,
                hidden: None,
            });

        std::iter::once(raw).chain(overlays).collect()
    }

    fn spans(&self) -> Vec<Range<usize>> {
        let values = self.series.values();

        match self.season_threshold {
            Some(threshold) => split_seasons(values, threshold),
            None => vec![0..values.len()],
        }
    }

    fn points<I>(&self, ys: I) -> Vec<DataPoint>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        ys.into_iter()
            .enumerate()
            .map(|(i, y)| DataPoint { x: self.x_of(i), y })
            .collect()
    }

    fn x_of(&self, index: usize) -> f64 {
        match self.x_axis_mode {
            XAxisMode::Date => index as f64,
            XAxisMode::SequenceIndex => (index + 1) as f64,
        }
    }

    fn x_axis(&self) -> XAxis {
        let grid = Grid {
            display: true,
            color: Some(X_GRID_COLOR.to_owned()),
            line_width: Some(0.5),
            draw_ticks: None,
        };

        match self.x_axis_mode {
            XAxisMode::Date => XAxis {
                kind: AxisType::xaxis(self.x_axis_mode),
                labels: Some(self.series.timestamps().iter().map(|ts| short_label(ts)).collect()),
                min: None,
                max: None,
                grid,
                ticks: x_ticks(DATE_MAX_TICKS),
                fixed_ticks: None,
            },
            XAxisMode::SequenceIndex => {
                let count = self.series.len();
                let last = count.max(1) as f64;

                let mut ticks = Vec::new();
                if count > 0 {
                    ticks = linear_ticks(1.0, last, SEQUENCE_MAX_TICKS);
                    fix_last_tick(&mut ticks, last);
                }

                XAxis {
                    kind: AxisType::xaxis(self.x_axis_mode),
                    labels: None,
                    min: Some(1.0),
                    max: Some(last),
                    grid,
                    ticks: TickOptions {
                        auto_skip: Some(false),
                        ..x_ticks(SEQUENCE_MAX_TICKS)
                    },
                    fixed_ticks: Some(ticks),
                }
            }
        }
    }

    fn primary_axis(&self, datasets: &[Dataset]) -> YAxis {
        let values = datasets
            .iter()
            .filter(|dataset| dataset.hidden != Some(true))
            .flat_map(|dataset| dataset.data.iter().filter_map(|point| point.y));
        let range = ValueRange::enclosing(values, Y_STEP);

        YAxis {
            position: Position::Left,
            min: range.min,
            max: range.max,
            grid: Grid {
                display: true,
                color: None,
                line_width: None,
                draw_ticks: Some(true),
            },
            ticks: y_ticks(),
            grid_lines: range.grid_lines(Y_STEP),
        }
    }

    fn plugins(&self) -> Plugins {
        Plugins {
            legend: Legend {
                labels: LegendLabels {
                    color: LEGEND_COLOR.to_owned(),
                    box_width: 10,
                    font: Font { size: 11 },
                },
            },
            tooltip: Tooltip {
                titles: self.series.timestamps().iter().map(|ts| long_label(ts)).collect(),
            },
        }
    }
}

/// The right-hand axis: same bounds as the primary one, without a grid.
fn secondary_axis(primary: &YAxis) -> YAxis {
    YAxis {
        position: Position::Right,
        min: primary.min,
        max: primary.max,
        grid: Grid::hidden(),
        ticks: y_ticks(),
        grid_lines: Vec::new(),
    }
}

fn x_ticks(max_ticks_limit: usize) -> TickOptions {
    TickOptions {
        color: TICK_COLOR.to_owned(),
        font: Font { size: 10 },
        step_size: None,
        max_rotation: Some(0),
        auto_skip: Some(true),
        max_ticks_limit: Some(max_ticks_limit),
    }
}

fn y_ticks() -> TickOptions {
    TickOptions {
        color: TICK_COLOR.to_owned(),
        font: Font { size: 10 },
        step_size: Some(Y_STEP),
        max_rotation: None,
        auto_skip: None,
        max_ticks_limit: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mrlens_series::AverageKind;

    fn series(values: &[f64]) -> CleanedSeries {
        CleanedSeries::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, y)| (*y, format!("2025-08-{:02}T12:00:00+09:00", i % 28 + 1))),
        )
    }

    fn only(line: LineConfig) -> [LineConfig; LINE_COUNT] {
        [line, LineConfig::default(), LineConfig::default()]
    }

    #[test]
    fn sma_overlay_follows_the_raw_series() {
        let series = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);

        let spec = ChartConfigBuilder::new(&series)
            .lines(only(LineConfig::new(true, AverageKind::Sma, 3)))
            .build();

        let datasets = &spec.data.datasets;
        assert_eq!(spec.labels().collect::<Vec<_>>(), ["Raw MR", "SMA(3)"]);
        assert_eq!(
            datasets[0].values(),
            [Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)]
        );
        assert_eq!(
            datasets[1].values(),
            [None, None, Some(20.0), Some(30.0), Some(40.0)]
        );
        assert_eq!(datasets[0].order, Some(10));
        assert_eq!(datasets[1].border_color, "#ff6384");
    }

    #[test]
    fn ema_overlay_is_defined_from_the_first_match() {
        let series = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);

        let spec = ChartConfigBuilder::new(&series)
            .lines(only(LineConfig::new(true, AverageKind::Ema, 3)))
            .build();

        assert_eq!(
            spec.data.datasets[1].values(),
            [Some(10.0), Some(15.0), Some(22.5), Some(31.25), Some(40.625)]
        );
    }

    #[test]
    fn enabled_lines_follow_slot_order() {
        let series = series(&[1500.0, 1510.0, 1520.0]);
        let lines = [
            LineConfig::new(false, AverageKind::Ema, 300),
            LineConfig::new(true, AverageKind::Sma, 2),
            LineConfig::new(true, AverageKind::Ema, 100),
        ];

        let spec = ChartConfigBuilder::new(&series).lines(lines).build();

        assert_eq!(
            spec.labels().collect::<Vec<_>>(),
            ["Raw MR", "SMA(2)", "EMA(100)"]
        );
        assert_eq!(spec.data.datasets[1].border_color, "#36a2eb");
        assert_eq!(spec.data.datasets[2].border_color, "#4bc0c0");
    }

    #[test]
    fn date_mode_labels_every_match() {
        let series = CleanedSeries::from_pairs([
            (1500.0, "2025-08-01T23:00:00+09:00"),
            (1510.0, "garbled"),
        ]);

        let spec = ChartConfigBuilder::new(&series).build();
        let x = &spec.options.scales.x;

        assert_eq!(x.kind, AxisType::Category);
        assert_eq!(x.labels.as_deref(), Some(&["8/1".to_owned(), "garbled".to_owned()][..]));
        assert_eq!((x.min, x.max), (None, None));
        assert!(x.fixed_ticks.is_none());
        assert_eq!(spec.data.datasets[0].data[1].x, 1.0);
    }

    #[test]
    fn sequence_mode_spans_every_match() {
        let values: Vec<f64> = (0..37).map(|i| 1500.0 + i as f64).collect();
        let series = series(&values);

        let spec = ChartConfigBuilder::new(&series)
            .x_axis_mode(XAxisMode::SequenceIndex)
            .build();
        let x = &spec.options.scales.x;

        assert_eq!(x.kind, AxisType::Linear);
        assert!(x.labels.is_none());
        assert_eq!((x.min, x.max), (Some(1.0), Some(37.0)));

        let ticks = x.fixed_ticks.as_ref().unwrap();
        assert_eq!(ticks.first().map(|tick| tick.value), Some(1.0));
        assert_eq!(ticks.last().map(|tick| tick.value), Some(37.0));
        assert!(!ticks.iter().any(|tick| tick.value == 35.0));
        assert_eq!(x.ticks.auto_skip, Some(false));

        let raw = &spec.data.datasets[0].data;
        assert_eq!((raw[0].x, raw[36].x), (1.0, 37.0));
    }

    #[test]
    fn hidden_raw_series_leaves_the_y_range_to_the_overlays() {
        let series = series(&[1000.0, 1600.0, 1610.0, 1620.0]);
        let mut lines = OverlaySettings::default().lines;
        lines[0] = LineConfig::new(true, AverageKind::Sma, 2);

        let spec = ChartConfigBuilder::new(&series).lines(lines).hide_raw(true).build();
        let raw = &spec.data.datasets[0];

        assert_eq!(raw.hidden, Some(true));
        assert_eq!(raw.values().len(), 4);
        assert_eq!((spec.options.scales.y.min, spec.options.scales.y.max), (1300.0, 1625.0));
        assert!(serde_json::to_string(&spec).is_ok_and(|json| json.contains(r#""hidden":true"#)));

        let shown = ChartConfigBuilder::new(&series).lines(lines).build();
        assert_eq!(shown.data.datasets[0].hidden, None);
        assert_eq!(shown.options.scales.y.min, 1000.0);
    }

    #[test]
    fn secondary_axis_mirrors_the_primary_one() {
        let series = series(&[1488.0, 1530.0, 1512.0]);

        let spec = ChartConfigBuilder::new(&series).build();
        let scales = &spec.options.scales;

        assert_eq!((scales.y.min, scales.y.max), (1475.0, 1550.0));
        assert_eq!((scales.y2.min, scales.y2.max), (scales.y.min, scales.y.max));
        assert_eq!(scales.y.position, Position::Left);
        assert_eq!(scales.y2.position, Position::Right);
        assert_eq!(scales.y.ticks.step_size, Some(25.0));
        assert_eq!(scales.y.grid_lines.len(), 2);
        assert!(!scales.y2.grid.display);
    }

    #[test]
    fn tooltip_titles_keep_the_match_time() {
        let series = CleanedSeries::from_pairs([(1500.0, "2025-08-01T21:30:05+09:00")]);

        let spec = ChartConfigBuilder::new(&series)
            .x_axis_mode(XAxisMode::SequenceIndex)
            .build();

        assert_eq!(spec.options.plugins.tooltip.titles, ["2025/8/1 21:30:05"]);
    }

    #[test]
    fn seasons_restart_the_averages() {
        let series = series(&[1500.0, 1510.0, 1800.0, 1820.0]);

        let spec = ChartConfigBuilder::new(&series)
            .lines(only(LineConfig::new(true, AverageKind::Sma, 2)))
            .season_threshold(Some(100.0))
            .build();

        assert_eq!(
            spec.data.datasets[1].values(),
            [None, Some(1505.0), None, Some(1810.0)]
        );
    }

    #[test]
    fn empty_series_still_builds() {
        let series = CleanedSeries::default();

        let spec = ChartConfigBuilder::new(&series)
            .x_axis_mode(XAxisMode::SequenceIndex)
            .build();

        assert!(spec.data.datasets.iter().all(|dataset| dataset.data.is_empty()));
        assert_eq!(spec.options.scales.x.fixed_ticks, Some(Vec::new()));
        assert_eq!((spec.options.scales.y.min, spec.options.scales.y.max), (0.0, 25.0));
    }

    #[test]
    fn serialize_as_chartjs_configuration() -> Result<(), serde_json::Error> {
        let series = series(&[1500.0]);

        let spec = ChartConfigBuilder::new(&series)
            .x_axis_mode(XAxisMode::SequenceIndex)
            .build();
        let json = serde_json::to_value(&spec)?;

        assert_eq!(json["type"], "line");
        assert_eq!(json["options"]["maintainAspectRatio"], false);
        assert_eq!(json["options"]["scales"]["x"]["type"], "linear");
        assert_eq!(json["options"]["scales"]["y"]["ticks"]["stepSize"], 25.0);
        assert_eq!(json["options"]["scales"]["y2"]["position"], "right");
        assert_eq!(json["data"]["datasets"][0]["borderColor"], "rgba(255,255,255,0.15)");
        assert!(json["data"]["datasets"][0].get("tension").is_none());
        Ok(())
    }
}
