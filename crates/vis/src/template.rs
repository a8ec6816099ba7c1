use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::error::Result;
use crate::render::OutputStream;

const CHART_TEMPLATE: &str = "chart";
const MATCHUP_TEMPLATE: &str = "matchup";

const STYLE: &str = include_str!("./template/style.css");
const SCRIPT: &str = include_str!("./template/overlay.js");

pub struct TemplateEngine {
    template: TinyTemplate<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<TemplateEngine> {
        let mut template = TinyTemplate::new();
        template.add_template(CHART_TEMPLATE, include_str!("./template/chart.html.tt"))?;
        template.add_template(MATCHUP_TEMPLATE, include_str!("./template/matchup.html.tt"))?;

        Ok(Self { template })
    }

    pub fn render_chart<O: OutputStream>(&self, context: &ChartContext, output: &mut O) -> Result<()> {
        let text = self.template.render(CHART_TEMPLATE, context)?;
        output.write(&text)
    }

    pub fn render_matchup<O: OutputStream>(
        &self,
        context: &MatchupContext,
        output: &mut O,
    ) -> Result<()> {
        let text = self.template.render(MATCHUP_TEMPLATE, context)?;
        output.write(&text)
    }
}

#[derive(Serialize)]
pub struct ChartContext {
    title: String,
    canvas_id: String,
    panel: String,
    spec: String,
    style: &'static str,
    script: &'static str,
}

impl ChartContext {
    /// `spec` is the JSON of the chart specification; it is embedded in a
    /// script element, so `</` is escaped.
    pub fn new(title: String, canvas_id: String, panel: String, spec: &str) -> ChartContext {
        Self {
            title,
            canvas_id,
            panel,
            spec: spec.replace("</", "<\\/"),
            style: STYLE,
            script: SCRIPT,
        }
    }
}

#[derive(Serialize)]
pub struct MatchupContext {
    title: String,
    table: String,
    style: &'static str,
}

impl MatchupContext {
    pub fn new(title: String, table: String) -> MatchupContext {
        Self {
            title,
            table,
            style: STYLE,
        }
    }
}
