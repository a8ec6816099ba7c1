use std::time::Duration;

use mrlens_series::DateRange;
use mrlens_series::KeyValueStore;
use mrlens_series::SeriesExtractor;
use mrlens_series::SeriesKind;
use mrlens_vis::OverlayController;
use mrlens_vis::SettingsPanel;
use mrlens_vis::layout::VisLayout;
use mrlens_vis::overlay::ChartCanvas;
use mrlens_vis::overlay::HostPage;
use mrlens_vis::overlay::OverlayOptions;
use mrlens_vis::overlay::PageEvent;
use mrlens_vis::overlay::RenderOutcome;
use mrlens_vis::render::page::HtmlCanvas;
use tracing::debug;
use tracing::info;

use crate::cli::PathExt;
use crate::cli::ViewArgs;
use crate::error::CliError;
use crate::page::SavedPage;
use crate::store::FileStore;
use crate::watch::watch_page;

pub(crate) fn view(args: ViewArgs) -> Result<(), CliError> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(CliError::Argument(format!(
                "the first day `{from}` comes after the last day `{to}`"
            )));
        }
    }

    let output_path = args.output_path.clone().or_current_dir()?;
    let layout = VisLayout::init(&output_path)?;
    let store = FileStore::open(args.store.clone())?;
    let kind = SeriesKind::from(args.metric);

    info!(
        input = %args.input.display(),
        output = %layout.root_path().display(),
        store = %store.path().display(),
        "charting the rating history"
    );

    let canvas = HtmlCanvas::new(layout.chart_file_path())?.title(format!("{} history", kind.label()));
    let options = OverlayOptions {
        season_threshold: args.season_threshold,
        hide_raw: args.hide_raw,
        date_range: DateRange::new(args.from, args.to),
    };
    let mut controller = OverlayController::new(SavedPage::new(&args.input), canvas, store)
        .extractor(SeriesExtractor::new(kind))
        .options(options);

    let mut outcome = None;
    if let Some(panel) = edited_panel(&args, &controller) {
        controller.handle(PageEvent::Edit(panel))?;
        outcome = Some(controller.handle(PageEvent::Update)?);
    }

    if args.watch {
        info!(interval = args.interval, "watching the page for changes; press Ctrl-C to stop");
        controller.run(watch_page(args.input.clone(), Duration::from_millis(args.interval)));
        return Ok(());
    }

    let outcome = match outcome {
        Some(outcome) => outcome,
        None => controller.handle(PageEvent::StartupTimer)?,
    };

    match outcome {
        RenderOutcome::Rendered => {
            debug!(
                host_chart_hidden = controller.page().host_chart_hidden(),
                "the overlay replaced the host chart"
            );
            println!(
                "mrlens charted the {} history of `{}` in: `{}`",
                kind.label(),
                args.input.display(),
                controller.canvas().path().display()
            );
            Ok(())
        }
        RenderOutcome::Skipped | RenderOutcome::Deferred => Err(CliError::NotFound(format!(
            "the `{}` page carries no {} series",
            args.input.display(),
            kind.label()
        ))),
    }
}

/// The settings panel as edited by the command line overrides, if any.
fn edited_panel<P, C, S>(args: &ViewArgs, controller: &OverlayController<P, C, S>) -> Option<SettingsPanel>
where
    P: HostPage,
    C: ChartCanvas,
    S: KeyValueStore,
{
    if args.lines.is_empty() && args.disable.is_empty() && args.x_axis.is_none() {
        return None;
    }

    let mut panel = SettingsPanel::from_settings(&controller.settings_store().load());

    for line in &args.lines {
        panel.set_line(line.slot, true, line.kind, &line.period);
    }

    for &slot in &args.disable {
        panel.set_enabled(slot, false);
    }

    if let Some(x_axis) = args.x_axis {
        panel.set_x_axis_mode(x_axis.into());
    }

    Some(panel)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;
    use mrlens_series::AverageKind;
    use mrlens_series::LineConfig;
    use mrlens_series::SettingsStore;
    use mrlens_series::XAxisMode;

    use super::*;
    use crate::cli::Cli;
    use crate::cli::Commands;

    const HISTORY_PAGE: &str = r#"<html><body>
        <div data-controller="chartjs" data-chartjs-data-value="{&quot;data&quot;:{&quot;datasets&quot;:[{&quot;label&quot;:&quot;MR&quot;,&quot;yAxisID&quot;:&quot;mr&quot;,&quot;data&quot;:[{&quot;x&quot;:&quot;2025-08-01T10:00:00+09:00&quot;,&quot;y&quot;:1500},{&quot;x&quot;:&quot;2025-08-02T10:00:00+09:00&quot;,&quot;y&quot;:null},{&quot;x&quot;:&quot;2025-08-03T10:00:00+09:00&quot;,&quot;y&quot;:1530}]}]}}"></div>
    </body></html>"#;

    fn view_args(dir: &Path, extra: &[&str]) -> ViewArgs {
        let input = dir.join("history.html");
        let store = dir.join("storage.json");

        let mut argv = vec![
            String::from("mrlens"),
            String::from("view"),
            String::from("-i"),
            input.display().to_string(),
            String::from("-o"),
            dir.display().to_string(),
            String::from("--store"),
            store.display().to_string(),
        ];
        argv.extend(extra.iter().map(|arg| arg.to_string()));

        match Cli::try_parse_from(argv) {
            Ok(Cli {
                command: Commands::View(args),
            }) => args,
            _ => panic!("the view command did not parse"),
        }
    }

    #[test]
    fn view_writes_the_chart_page() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), HISTORY_PAGE)?;

        view(view_args(dir.path(), &[]))?;

        let page = fs::read_to_string(dir.path().join("vis").join("index.html"))?;
        assert!(page.contains(r#""label":"Raw MR""#));
        assert!(page.contains(r#""label":"EMA(300)""#));
        assert!(!dir.path().join("storage.json").exists());
        Ok(())
    }

    #[test]
    fn overrides_are_saved() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), HISTORY_PAGE)?;

        view(view_args(
            dir.path(),
            &["--line", "2:SMA:2", "--disable", "1", "--x-axis", "count"],
        ))?;

        let settings = SettingsStore::new(FileStore::new(dir.path().join("storage.json"))).load();
        assert!(!settings.lines[0].enabled);
        assert_eq!(settings.lines[1], LineConfig::new(true, AverageKind::Sma, 2));
        assert_eq!(settings.x_axis_mode, XAxisMode::SequenceIndex);

        let page = fs::read_to_string(dir.path().join("vis").join("index.html"))?;
        assert!(page.contains(r#""label":"SMA(2)""#));
        assert!(!page.contains(r#""label":"EMA(300)""#));
        Ok(())
    }

    #[test]
    fn page_without_series_is_reported() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), "<html></html>")?;

        let result = view(view_args(dir.path(), &[]));

        assert!(matches!(result, Err(CliError::NotFound(_))));
        assert!(!dir.path().join("vis").join("index.html").exists());
        Ok(())
    }

    #[test]
    fn reversed_dates_are_rejected() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), HISTORY_PAGE)?;

        let result = view(view_args(dir.path(), &["--from", "2025-08-03", "--to", "2025-08-01"]));

        assert!(matches!(result, Err(CliError::Argument(_))));
        Ok(())
    }

    #[test]
    fn overrides_replace_a_corrupt_store() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), HISTORY_PAGE)?;
        fs::write(dir.path().join("storage.json"), "not json")?;

        view(view_args(dir.path(), &["--x-axis", "count"]))?;

        let settings = SettingsStore::new(FileStore::new(dir.path().join("storage.json"))).load();
        assert_eq!(settings.x_axis_mode, XAxisMode::SequenceIndex);
        assert_eq!(settings.lines[0], LineConfig::new(true, AverageKind::Ema, 300));
        Ok(())
    }

    #[test]
    fn raw_line_can_be_hidden() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("history.html"), HISTORY_PAGE)?;

        view(view_args(dir.path(), &["--hide-raw"]))?;

        let page = fs::read_to_string(dir.path().join("vis").join("index.html"))?;
        assert!(page.contains(r#""label":"Raw MR""#));
        assert!(page.contains(r#""hidden":true"#));
        Ok(())
    }
}
