//! The layout of the output directory.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Result;

/// The visualization directory is structured as follows:
///
/// ./vis/index.html
/// ./vis/matchup.html
///
/// The __index__ file holds the rating chart with its overlays.
/// The __matchup__ file holds the matchup table.
#[derive(Debug, Clone)]
pub struct VisLayout {
    root_path: PathBuf,
    chart_file_path: PathBuf,
    matchup_file_path: PathBuf,
}

impl VisLayout {
    const MAIN_DIR_NAME: &str = "vis";
    const CHART_FILE_NAME: &str = "index.html";
    const MATCHUP_FILE_NAME: &str = "matchup.html";

    /// Creates the visualization directory under `path`. An existing one is
    /// reused.
    pub fn init(path: &Path) -> Result<VisLayout> {
        let root_path = path.join(Self::MAIN_DIR_NAME);
        let chart_file_path = root_path.join(Self::CHART_FILE_NAME);
        let matchup_file_path = root_path.join(Self::MATCHUP_FILE_NAME);

        fs::create_dir_all(&root_path)?;

        Ok(Self {
            root_path,
            chart_file_path,
            matchup_file_path,
        })
    }

    /// The visualization directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The page of the rating chart.
    pub fn chart_file_path(&self) -> &Path {
        &self.chart_file_path
    }

    /// The page of the matchup table.
    pub fn matchup_file_path(&self) -> &Path {
        &self.matchup_file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_and_reuses_the_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let layout = VisLayout::init(dir.path())?;
        assert!(layout.root_path().is_dir());
        assert_eq!(layout.chart_file_path(), dir.path().join("vis").join("index.html"));
        assert_eq!(layout.matchup_file_path(), dir.path().join("vis").join("matchup.html"));

        VisLayout::init(dir.path())?;
        Ok(())
    }
}
