//! The markup of the overlay settings panel.
//!
//! A rendered page is a snapshot, so the panel only shows the settings it
//! was drawn with. The fields are changed from the command line.

use mrlens_series::AverageKind;
use mrlens_series::XAxisMode;

use crate::config::LINE_COLORS;
use crate::error::VisError;
use crate::panel::SettingsPanel;
use crate::render::OutputStream;
use crate::render::Render;
use crate::render::write_escaped;

/// The id of the update button.
pub const UPDATE_BUTTON_ID: &str = "update-graph-btn";

/// The id of the X axis mode selector.
pub const X_AXIS_SELECT_ID: &str = "x-axis-type";

impl Render for SettingsPanel {
    fn render<O>(&self, output: &mut O) -> Result<(), VisError>
    where
        O: OutputStream,
    {
        output.write(r#"<form class="mrlens-settings" id="mrlens-settings"><fieldset disabled>"#)?;

        output.write(&format!(
            r#"<label>X axis <select id="{X_AXIS_SELECT_ID}">"#
        ))?;
        for (mode, value, text) in [
            (XAxisMode::Date, "date", "Date"),
            (XAxisMode::SequenceIndex, "count", "Match count"),
        ] {
            output.write(&format!(
                r#"<option value="{value}"{}>{text}</option>"#,
                selected(self.x_axis_mode == mode)
            ))?;
        }
        output.write("</select></label>")?;

        for (i, (line, color)) in self.lines.iter().zip(LINE_COLORS).enumerate() {
            let slot = i + 1;

            output.write(&format!(
                r#"<div class="mrlens-line" style="border-left: 4px solid {color}">"#
            ))?;
            output.write(&format!(
                r#"<input type="checkbox" id="line-{slot}-on"{}>"#,
                if line.enabled { " checked" } else { "" }
            ))?;

            output.write(&format!(r#"<select id="line-{slot}-type">"#))?;
            for kind in [AverageKind::Ema, AverageKind::Sma] {
                output.write(&format!(
                    r#"<option value="{kind}"{}>{kind}</option>"#,
                    selected(line.kind == kind)
                ))?;
            }
            output.write("</select>")?;

            output.write(&format!(
                r#"<input type="number" min="1" id="line-{slot}-period" value=""#
            ))?;
            write_escaped(output, &line.period)?;
            output.write(r#""></div>"#)?;
        }

        output.write(&format!(
            r#"<button type="button" id="{UPDATE_BUTTON_ID}">Update</button>"#
        ))?;
        output.write("</fieldset></form>")
    }
}

fn selected(is_selected: bool) -> &'static str {
    if is_selected { " selected" } else { "" }
}
