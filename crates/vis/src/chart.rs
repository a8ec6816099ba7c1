//! The declarative chart specification handed to the charting library.
//!
//! The specification serializes to a Chart.js configuration. The parts that
//! Chart.js expects as callbacks, such as per-tick grid styles and tooltip
//! titles, are precomputed here and carried as data next to the options
//! they replace.

pub mod axes;

use serde::Serialize;

use crate::chart::axes::AxisType;
use crate::chart::axes::GridLine;
use crate::chart::axes::Tick;

/// A complete chart specification.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// The chart type.
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// The datasets, in drawing order.
    pub data: ChartData,
    /// The scales and plugins.
    pub options: ChartOptions,
}

impl ChartSpec {
    /// The dataset labels, in drawing order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.data.datasets.iter().map(|dataset| dataset.label.as_str())
    }
}

/// The chart type.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// A line chart.
    #[default]
    Line,
}

/// The datasets of a chart.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct ChartData {
    /// The raw series first, followed by the enabled overlay lines.
    pub datasets: Vec<Dataset>,
}

/// A styled line of the chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// The legend label.
    pub label: String,
    /// The points of the line.
    pub data: Vec<DataPoint>,
    /// The line color.
    pub border_color: String,
    /// The line width in pixels.
    pub border_width: f64,
    /// The point radius in pixels.
    pub point_radius: f64,
    /// The bezier curve tension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    /// The drawing order; higher values are drawn behind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Whether the line starts hidden. It can still be shown from the legend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl Dataset {
    /// The Y values of the points.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.data.iter().map(|point| point.y).collect()
    }
}

/// A point of a dataset. A missing `y` leaves a gap in the line.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// The X coordinate: the label index on a category axis or the match
    /// number on a linear axis.
    pub x: f64,
    /// The Y coordinate.
    pub y: Option<f64>,
}

/// The chart options.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Whether the chart resizes with its container.
    pub responsive: bool,
    /// Whether the canvas keeps its aspect ratio when resizing.
    pub maintain_aspect_ratio: bool,
    /// The axes.
    pub scales: Scales,
    /// The legend and the tooltip.
    pub plugins: Plugins,
}

/// The axes of the chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scales {
    /// The X axis.
    pub x: XAxis,
    /// The primary Y axis, on the left.
    pub y: YAxis,
    /// The secondary Y axis, on the right, mirroring the primary one.
    pub y2: YAxis,
}

/// The X axis.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    /// The axis type.
    #[serde(rename = "type")]
    pub kind: AxisType,
    /// The category labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// The forced lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// The forced upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// The grid lines.
    pub grid: Grid,
    /// The tick options.
    pub ticks: TickOptions,
    /// Ticks that replace the generated ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_ticks: Option<Vec<Tick>>,
}

/// A Y axis.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    /// The side of the chart the axis is drawn on.
    pub position: Position,
    /// The lower bound.
    pub min: f64,
    /// The upper bound.
    pub max: f64,
    /// The grid lines.
    pub grid: Grid,
    /// The tick options.
    pub ticks: TickOptions,
    /// The style of the grid line at each tick.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grid_lines: Vec<GridLine>,
}

/// The side of the chart an axis is drawn on.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// The left side.
    Left,
    /// The right side.
    Right,
}

/// The grid lines of an axis.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    /// Whether grid lines are drawn.
    pub display: bool,
    /// The grid line color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// The grid line width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    /// Whether the tick marks are drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_ticks: Option<bool>,
}

impl Grid {
    /// A hidden grid.
    pub fn hidden() -> Grid {
        Self {
            display: false,
            color: None,
            line_width: None,
            draw_ticks: None,
        }
    }
}

/// The tick options of an axis.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickOptions {
    /// The label color.
    pub color: String,
    /// The label font.
    pub font: Font,
    /// The fixed distance between ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    /// The maximum label rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rotation: Option<u32>,
    /// Whether labels are skipped to avoid overlaps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_skip: Option<bool>,
    /// The maximum number of ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks_limit: Option<usize>,
}

/// A font.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// The font size in pixels.
    pub size: u32,
}

/// The chart plugins.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Plugins {
    /// The legend.
    pub legend: Legend,
    /// The tooltip.
    pub tooltip: Tooltip,
}

/// The legend.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Legend {
    /// The legend labels.
    pub labels: LegendLabels,
}

/// The legend labels.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabels {
    /// The label color.
    pub color: String,
    /// The width of the color box.
    pub box_width: u32,
    /// The label font.
    pub font: Font,
}

/// The tooltip.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// The title of the tooltip for each point index: the original timestamp
    /// of the match in long form, whatever the X axis mode.
    pub titles: Vec<String>,
}
