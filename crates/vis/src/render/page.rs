//! Standalone HTML pages: the overlay chart and the matchup table.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use mrlens_series::matchup::MatchupTable;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::id::ChartId;
use crate::overlay::ChartCanvas;
use crate::overlay::ChartHandle;
use crate::overlay::OverlayView;
use crate::render::output::OutputFile;
use crate::render::render_to_string;
use crate::render::table::MatchupView;
use crate::template::ChartContext;
use crate::template::MatchupContext;
use crate::template::TemplateEngine;

/// A [`ChartCanvas`] that draws every chart as a page at a fixed path.
pub struct HtmlCanvas {
    path: PathBuf,
    title: String,
    template: TemplateEngine,
}

impl HtmlCanvas {
    /// Creates a canvas writing its charts to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Result<HtmlCanvas> {
        Ok(Self {
            path: path.into(),
            title: String::from("Rating history"),
            template: TemplateEngine::new()?,
        })
    }

    /// Sets the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The path of the chart page.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartCanvas for HtmlCanvas {
    type Handle = HtmlChart;

    fn create(&mut self, view: &OverlayView) -> Result<HtmlChart> {
        let id = ChartId::next();
        let context = ChartContext::new(
            self.title.clone(),
            id.element_id(),
            render_to_string(&view.panel)?,
            &serde_json::to_string(&view.spec)?,
        );

        let mut output = OutputFile::create(&self.path)?;
        self.template.render_chart(&context, &mut output)?;
        output.finish()?;

        info!(chart = %id, path = %self.path.display(), "wrote the chart page");

        Ok(HtmlChart {
            id,
            path: self.path.clone(),
        })
    }
}

/// A chart page written by an [`HtmlCanvas`].
#[derive(Debug)]
pub struct HtmlChart {
    id: ChartId,
    path: PathBuf,
}

impl HtmlChart {
    /// The id of the chart.
    pub fn id(&self) -> ChartId {
        self.id
    }

    /// The path of the chart page.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartHandle for HtmlChart {
    fn destroy(self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }

        debug!(chart = %self.id, "removed the chart page");
        Ok(())
    }
}

/// Writes the page of the matchup table to `path`.
pub fn write_matchup_page(path: &Path, title: &str, table: &MatchupTable) -> Result<()> {
    let template = TemplateEngine::new()?;
    let context = MatchupContext::new(title.to_owned(), render_to_string(&MatchupView::new(table))?);

    let mut output = OutputFile::create(path)?;
    template.render_matchup(&context, &mut output)?;
    output.finish()?;

    info!(rows = table.rows().len(), path = %path.display(), "wrote the matchup page");
    Ok(())
}
