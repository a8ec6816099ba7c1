//! Axis types, tick generation and the Y axis range.

use serde::Serialize;

use mrlens_series::XAxisMode;

/// The step between the ticks of the Y axes.
pub const Y_STEP: f64 = 25.0;

/// Every tick that is a multiple of this value gets an emphasized grid line.
pub const Y_EMPHASIS_EVERY: f64 = 50.0;

const EMPHASIS_GRID_COLOR: &str = "#777";
const EMPHASIS_GRID_WIDTH: f64 = 1.0;
const GRID_COLOR: &str = "#555";
const GRID_WIDTH: f64 = 0.5;

/// The last tick is replaced rather than followed by another one when it is
/// closer than this share of the axis length to the end.
const LAST_TICK_MARGIN: f64 = 0.1;

/// Chart.js stops honoring the Y step beyond this many ticks, so no grid
/// lines are styled past it.
const MAX_GRID_STEPS: f64 = 1000.0;

/// The type of an axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    /// One evenly spaced slot per label.
    #[default]
    Category,
    /// A numeric axis.
    Linear,
}

impl AxisType {
    /// The type of the X axis in the given mode.
    pub fn xaxis(mode: XAxisMode) -> AxisType {
        match mode {
            XAxisMode::Date => AxisType::Category,
            XAxisMode::SequenceIndex => AxisType::Linear,
        }
    }
}

/// A tick of a numeric axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// The position of the tick.
    pub value: f64,
    /// The tick label.
    pub label: String,
}

impl Tick {
    /// A tick at `value`, labelled with the value.
    pub fn at(value: f64) -> Tick {
        Self {
            value,
            label: value.to_string(),
        }
    }
}

/// The style of the Y grid line at one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLine {
    /// The tick value.
    pub value: f64,
    /// The line color.
    pub color: &'static str,
    /// The line width.
    pub line_width: f64,
}

impl GridLine {
    /// The grid line at `value`: emphasized on multiples of
    /// [`Y_EMPHASIS_EVERY`], light otherwise.
    pub fn at(value: f64) -> GridLine {
        let emphasized = value % Y_EMPHASIS_EVERY == 0.0;

        Self {
            value,
            color: if emphasized { EMPHASIS_GRID_COLOR } else { GRID_COLOR },
            line_width: if emphasized { EMPHASIS_GRID_WIDTH } else { GRID_WIDTH },
        }
    }
}

/// The bounds of a Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// The lower bound.
    pub min: f64,
    /// The upper bound.
    pub max: f64,
}

impl ValueRange {
    /// The range of the primary Y axis: the smallest multiples of `step`
    /// enclosing every value. An empty series yields a single step from zero.
    pub fn enclosing<I>(values: I, step: f64) -> ValueRange
    where
        I: IntoIterator<Item = f64>,
    {
        let bounds = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |bounds: Option<(f64, f64)>, value| match bounds {
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
                None => Some((value, value)),
            });

        let Some((lo, hi)) = bounds else {
            return Self { min: 0.0, max: step };
        };

        let min = (lo / step).floor() * step;
        let mut max = (hi / step).ceil() * step;
        if max <= min {
            max = min + step;
        }

        Self { min, max }
    }

    /// The emphasized grid lines of the range, at the multiples of
    /// [`Y_EMPHASIS_EVERY`] that fall on a step.
    ///
    /// The other steps keep the light default style and are left out. A range
    /// of more than 1000 steps gets no grid lines at all.
    pub fn grid_lines(&self, step: f64) -> Vec<GridLine> {
        let steps = ((self.max - self.min) / step).round();
        if !steps.is_finite() || steps > MAX_GRID_STEPS {
            return Vec::new();
        }

        (0..=steps as usize)
            .map(|i| GridLine::at(self.min + i as f64 * step))
            .filter(|line| line.value % Y_EMPHASIS_EVERY == 0.0)
            .collect()
    }
}

/// Generates the ticks of a linear axis from `min` to `max`, spaced by a
/// "nice" step so that there are at most `max_ticks` of them.
///
/// The first tick is `min`; the others are the multiples of the step within
/// the range. The step is never smaller than 1 since the axis counts matches.
pub fn linear_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<Tick> {
    if max <= min || max_ticks < 2 {
        return vec![Tick::at(min)];
    }

    let range = nice_number(max - min, false);
    let mut spacing = nice_number(range / (max_ticks - 1) as f64, true).max(1.0);
    while tick_count(min, max, spacing) > max_ticks {
        spacing = nice_number(spacing * 2.0, true);
    }

    let mut ticks = vec![Tick::at(min)];
    let mut multiple = (min / spacing).floor() + 1.0;

    loop {
        let value = multiple * spacing;
        if value > max {
            break;
        }

        ticks.push(Tick::at(value));
        multiple += 1.0;
    }

    ticks
}

fn tick_count(min: f64, max: f64, spacing: f64) -> usize {
    ((max / spacing).floor() - (min / spacing).floor()) as usize + 1
}

/// Makes sure the last tick sits on `last`.
///
/// A last tick that differs from `last` is moved onto it when it is within
/// 10% of `last`, so the two labels do not collide; otherwise a tick at
/// `last` is appended.
pub fn fix_last_tick(ticks: &mut Vec<Tick>, last: f64) {
    let Some(tick) = ticks.last_mut() else {
        return;
    };

    if tick.value == last {
        return;
    }

    if last - tick.value < last * LAST_TICK_MARGIN {
        *tick = Tick::at(last);
    } else {
        ticks.push(Tick::at(last));
    }
}

fn nice_number(range: f64, round: bool) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10f64.powf(exponent);

    let nice_fraction = if round {
        match fraction {
            f if f < 1.5 => 1.0,
            f if f < 3.0 => 2.0,
            f if f < 7.0 => 5.0,
            _ => 10.0,
        }
    } else {
        match fraction {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        }
    };

    nice_fraction * 10f64.powf(exponent)
}
