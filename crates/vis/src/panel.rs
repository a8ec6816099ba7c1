//! The view model of the overlay settings panel.
//!
//! The panel holds the form fields as the user left them. Nothing in it takes
//! effect until it is committed with [`SettingsPanel::to_settings`], which is
//! what the update action does.

use mrlens_series::AverageKind;
use mrlens_series::LineConfig;
use mrlens_series::OverlaySettings;
use mrlens_series::XAxisMode;
use mrlens_series::average::coerce_period;
use mrlens_series::settings::LINE_COUNT;
use serde::Serialize;

/// The fields of one overlay line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineField {
    /// The state of the enable checkbox.
    pub enabled: bool,
    /// The selected kind of moving average.
    pub kind: AverageKind,
    /// The text of the period field, as typed.
    pub period: String,
}

impl From<LineConfig> for LineField {
    fn from(line: LineConfig) -> Self {
        Self {
            enabled: line.enabled,
            kind: line.kind,
            period: line.period.to_string(),
        }
    }
}

impl LineField {
    /// The line configuration the field describes. A period that is not a
    /// positive number is read as 1.
    pub fn to_config(&self) -> LineConfig {
        LineConfig::new(self.enabled, self.kind, coerce_period(&self.period))
    }
}

/// The overlay settings panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsPanel {
    /// The line fields, by slot.
    pub lines: [LineField; LINE_COUNT],
    /// The selected X axis mode.
    pub x_axis_mode: XAxisMode,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

impl SettingsPanel {
    /// Fills the panel with the given settings.
    pub fn from_settings(settings: &OverlaySettings) -> SettingsPanel {
        Self {
            lines: settings.lines.map(LineField::from),
            x_axis_mode: settings.x_axis_mode,
        }
    }

    /// Reads the settings the panel currently describes.
    pub fn to_settings(&self) -> OverlaySettings {
        OverlaySettings {
            lines: self.line_configs(),
            x_axis_mode: self.x_axis_mode,
        }
    }

    /// The line configurations the panel currently describes.
    pub fn line_configs(&self) -> [LineConfig; LINE_COUNT] {
        [
            self.lines[0].to_config(),
            self.lines[1].to_config(),
            self.lines[2].to_config(),
        ]
    }

    /// Replaces the fields of the line in `slot`, counted from 0. Returns
    /// `false` when there is no such slot.
    pub fn set_line(&mut self, slot: usize, enabled: bool, kind: AverageKind, period: &str) -> bool {
        let Some(line) = self.lines.get_mut(slot) else {
            return false;
        };

        *line = LineField {
            enabled,
            kind,
            period: period.to_owned(),
        };
        true
    }

    /// Toggles the enable checkbox of the line in `slot`. Returns `false`
    /// when there is no such slot.
    pub fn set_enabled(&mut self, slot: usize, enabled: bool) -> bool {
        match self.lines.get_mut(slot) {
            Some(line) => {
                line.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Selects the X axis mode.
    pub fn set_x_axis_mode(&mut self, mode: XAxisMode) {
        self.x_axis_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_shows_the_settings() {
        let panel = SettingsPanel::default();

        assert!(panel.lines[0].enabled);
        assert_eq!(panel.lines[0].period, "300");
        assert_eq!(panel.lines[2].kind, AverageKind::Sma);
        assert_eq!(panel.to_settings(), OverlaySettings::default());
    }

    #[test]
    fn invalid_periods_commit_as_one() {
        let mut panel = SettingsPanel::default();

        assert!(panel.set_line(0, true, AverageKind::Sma, "abc"));
        assert!(panel.set_line(1, true, AverageKind::Ema, "-5"));
        assert!(panel.set_line(2, true, AverageKind::Ema, "0"));

        let lines = panel.line_configs();
        assert!(lines.iter().all(|line| line.period == 1));
        assert_eq!(lines[0].kind, AverageKind::Sma);
    }

    #[test]
    fn edits_outside_the_slots_are_rejected() {
        let mut panel = SettingsPanel::default();

        assert!(!panel.set_line(3, true, AverageKind::Sma, "10"));
        assert!(!panel.set_enabled(7, false));
        assert_eq!(panel, SettingsPanel::default());
    }

    #[test]
    fn axis_mode_and_toggles_commit() {
        let mut panel = SettingsPanel::default();

        panel.set_x_axis_mode(XAxisMode::SequenceIndex);
        panel.set_enabled(0, false);
        panel.set_enabled(1, true);

        let settings = panel.to_settings();
        assert_eq!(settings.x_axis_mode, XAxisMode::SequenceIndex);
        assert!(!settings.lines[0].enabled);
        assert_eq!(settings.lines[1], LineConfig::new(true, AverageKind::Ema, 100));
    }
}
