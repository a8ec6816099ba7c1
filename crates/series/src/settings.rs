//! The persisted configuration of the moving average overlay.
//!
//! The settings are stored as a single JSON document under [`SETTINGS_KEY`]:
//!
//! ```json
//! {"lines":[{"on":true,"type":"EMA","period":300}, ...],"xAxisType":"date"}
//! ```
//!
//! Older documents only hold the `lines` array; they decode with the date
//! axis.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing::warn;

use crate::average::AverageKind;
use crate::average::coerce_period;
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// The key the settings document is stored under.
pub const SETTINGS_KEY: &str = "sfbuff_ema_settings";

/// The number of overlay lines.
pub const LINE_COUNT: usize = 3;

/// The configuration of one overlay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineConfig {
    /// Whether the line is drawn.
    #[serde(rename = "on")]
    pub enabled: bool,

    /// The kind of moving average.
    #[serde(rename = "type")]
    pub kind: AverageKind,

    /// The number of matches the average spans. Always at least 1.
    pub period: usize,
}

impl LineConfig {
    /// Creates a line configuration. A zero period is raised to 1.
    pub fn new(enabled: bool, kind: AverageKind, period: usize) -> LineConfig {
        Self {
            enabled,
            kind,
            period: period.max(1),
        }
    }

    /// The dataset label of the line, such as `EMA(300)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.kind, self.period)
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::new(false, AverageKind::Ema, 100)
    }
}

/// How the X axis of the chart is laid out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XAxisMode {
    /// One category per match, labelled with the match date.
    #[default]
    #[serde(rename = "date")]
    Date,

    /// A linear axis of match numbers starting at 1.
    #[serde(rename = "count")]
    SequenceIndex,
}

/// The overlay configuration shared by every ranked history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlaySettings {
    /// The overlay lines, in drawing order.
    pub lines: [LineConfig; LINE_COUNT],

    /// The X axis layout.
    #[serde(rename = "xAxisType")]
    pub x_axis_mode: XAxisMode,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            lines: [
                LineConfig::new(true, AverageKind::Ema, 300),
                LineConfig::new(false, AverageKind::Ema, 100),
                LineConfig::new(false, AverageKind::Sma, 200),
            ],
            x_axis_mode: XAxisMode::Date,
        }
    }
}

impl OverlaySettings {
    /// Decodes a stored settings document, accepting the legacy bare array of
    /// lines as well.
    pub fn decode(document: &str) -> Result<OverlaySettings, serde_json::Error> {
        let stored: StoredSettings = serde_json::from_str(document)?;

        let (lines, x_axis_mode) = match stored {
            StoredSettings::Legacy(lines) => (lines, XAxisMode::Date),
            StoredSettings::Current { lines, x_axis_type } => {
                let mode = match x_axis_type.as_deref() {
                    Some("count") => XAxisMode::SequenceIndex,
                    _ => XAxisMode::Date,
                };
                (lines, mode)
            }
        };

        let mut decoded = [LineConfig::default(); LINE_COUNT];
        for (slot, line) in decoded.iter_mut().zip(lines) {
            *slot = line.into();
        }

        Ok(Self {
            lines: decoded,
            x_axis_mode,
        })
    }

    /// Encodes the settings as a JSON document.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredSettings {
    Legacy(Vec<StoredLine>),
    Current {
        #[serde(default)]
        lines: Vec<StoredLine>,
        #[serde(rename = "xAxisType", default)]
        x_axis_type: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct StoredLine {
    #[serde(default)]
    on: bool,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    period: Value,
}

impl From<StoredLine> for LineConfig {
    fn from(line: StoredLine) -> Self {
        let kind = line
            .kind
            .as_deref()
            .and_then(|kind| kind.parse().ok())
            .unwrap_or_default();

        let period = match line.period {
            Value::Number(number) => number
                .as_f64()
                .filter(|period| *period >= 1.0)
                .map_or(1, |period| period as usize),
            Value::String(text) => coerce_period(&text),
            _ => 1,
        };

        LineConfig::new(line.on, kind, period)
    }
}

/// Loads and saves the [`OverlaySettings`] from a [`KeyValueStore`].
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Creates a settings store on top of the key-value `store`.
    pub fn new(store: S) -> SettingsStore<S> {
        Self { store }
    }

    /// Loads the stored settings.
    ///
    /// Returns the defaults when nothing is stored yet, and also when the
    /// stored document cannot be read or decoded.
    pub fn load(&self) -> OverlaySettings {
        let document = match self.store.get(SETTINGS_KEY) {
            Ok(Some(document)) => document,
            Ok(None) => return OverlaySettings::default(),
            Err(error) => {
                warn!(%error, "could not read the overlay settings; using the defaults");
                return OverlaySettings::default();
            }
        };

        OverlaySettings::decode(&document).unwrap_or_else(|error| {
            warn!(%error, "the stored overlay settings are malformed; using the defaults");
            OverlaySettings::default()
        })
    }

    /// Saves `settings`, replacing the stored document.
    pub fn save(&mut self, settings: &OverlaySettings) -> Result<(), StoreError> {
        let document = settings.encode()?;
        self.store.set(SETTINGS_KEY, &document)?;

        info!(settings = %document, "saved the overlay settings");
        Ok(())
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the settings store, returning the key-value store.
    pub fn into_inner(self) -> S {
        self.store
    }
}
