use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use mrlens_series::extract::CHART_DATA_ATTRIBUTE;
use mrlens_series::matchup::COUNTED_CELLS;
use mrlens_series::matchup::MatchupRecord;
use mrlens_vis::error::Result;
use mrlens_vis::overlay::HostPage;
use mrlens_vis::panel::SettingsPanel;
use tracing::debug;

use crate::html::elements;
use crate::html::find_attribute;
use crate::html::inner_text;

/// A host page saved to a file.
///
/// The file is read again on every access, so a page that is saved over
/// while the overlay runs is picked up on the next render.
#[derive(Debug)]
pub(crate) struct SavedPage {
    path: PathBuf,
    panel_mounted: bool,
    host_chart_hidden: bool,
}

impl SavedPage {
    pub(crate) fn new(path: impl Into<PathBuf>) -> SavedPage {
        Self {
            path: path.into(),
            panel_mounted: false,
            host_chart_hidden: false,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn host_chart_hidden(&self) -> bool {
        self.host_chart_hidden
    }

    pub(crate) fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    /// The rows of the matchup table of the page.
    pub(crate) fn matchup_records(&self) -> io::Result<Vec<MatchupRecord>> {
        let html = self.read()?;
        Ok(matchup_records(&html))
    }
}

impl HostPage for SavedPage {
    fn chart_data(&self) -> Option<String> {
        match self.read() {
            Ok(html) => find_attribute(&html, CHART_DATA_ATTRIBUTE),
            Err(error) => {
                debug!(%error, path = %self.path.display(), "could not read the page");
                None
            }
        }
    }

    fn has_panel(&self) -> bool {
        self.panel_mounted
    }

    fn mount_panel(&mut self, _: &SettingsPanel) -> Result<()> {
        debug!(path = %self.path.display(), "mounted the settings panel");
        self.panel_mounted = true;
        Ok(())
    }

    fn hide_host_chart(&mut self) -> Result<()> {
        self.host_chart_hidden = true;
        Ok(())
    }
}

/// Reads the matchup records of every table body row of `html`. The cell
/// after the counted ones is kept as markup.
pub(crate) fn matchup_records(html: &str) -> Vec<MatchupRecord> {
    elements(html, "tbody")
        .into_iter()
        .flat_map(|body| elements(body, "tr"))
        .filter_map(|row| {
            let cells = elements(row, "td");
            let texts: Vec<String> = cells.iter().map(|cell| inner_text(cell)).collect();

            MatchupRecord::from_cells(&texts, cells.get(COUNTED_CELLS).map(|cell| cell.trim()))
        })
        .collect()
}
