//! The controller that draws the moving average overlay over a host page.
//!
//! The controller owns everything that lives for one page view: the settings
//! panel, the cached settings and the handle of the rendered chart. It reacts
//! to [`PageEvent`]s and talks to the page, the chart canvas and the settings
//! storage through the collaborator traits of this module.

use mrlens_series::DateRange;
use mrlens_series::KeyValueStore;
use mrlens_series::OverlaySettings;
use mrlens_series::SeriesExtractor;
use mrlens_series::SettingsStore;
use serde::Serialize;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::chart::ChartSpec;
use crate::config::ChartConfigBuilder;
use crate::error::Result;
use crate::panel::SettingsPanel;

/// The page the overlay is drawn on.
pub trait HostPage {
    /// The text of the chart data attribute of the host chart, if the host
    /// chart and its data are present.
    fn chart_data(&self) -> Option<String>;

    /// Returns `true` when the settings panel is already mounted on the page.
    fn has_panel(&self) -> bool;

    /// Mounts the settings panel on the page.
    fn mount_panel(&mut self, panel: &SettingsPanel) -> Result<()>;

    /// Hides the chart of the host page, which the overlay chart replaces.
    fn hide_host_chart(&mut self) -> Result<()>;
}

/// Draws charts.
pub trait ChartCanvas {
    /// The handle of a drawn chart.
    type Handle: ChartHandle;

    /// Draws the chart described by `view`.
    fn create(&mut self, view: &OverlayView) -> Result<Self::Handle>;
}

/// A chart drawn by a [`ChartCanvas`].
pub trait ChartHandle {
    /// Removes the chart.
    fn destroy(self) -> Result<()>;
}

/// Everything a canvas needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    /// The chart specification.
    pub spec: ChartSpec,
    /// The settings panel shown next to the chart.
    pub panel: SettingsPanel,
}

/// What happens on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The one-shot timer set when the page loads has fired.
    StartupTimer,
    /// The content of the page has changed, possibly attaching new chart
    /// data.
    ContentChanged,
    /// The user edited the settings panel.
    Edit(SettingsPanel),
    /// The user pressed the update button.
    Update,
    /// The user navigated to another page.
    Navigate,
}

/// The result of handling a [`PageEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The overlay chart was drawn.
    Rendered,
    /// Nothing was drawn because the page carries no rating series.
    Skipped,
    /// The event was recorded and takes effect on the next update.
    Deferred,
}

/// The state of the controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Waiting for the page to carry chart data.
    #[default]
    Idle,
    /// A render is in progress.
    Armed,
    /// The overlay chart is drawn.
    Rendered,
}

/// Options of the overlay that are not part of the persisted settings.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    /// Restarts the averages wherever the rating jumps by at least this much.
    pub season_threshold: Option<f64>,
    /// Hides the raw series behind the overlays.
    pub hide_raw: bool,
    /// Only the matches played within this range are drawn.
    pub date_range: DateRange,
}

/// Draws the overlay chart over a [`HostPage`].
pub struct OverlayController<P, C, S>
where
    C: ChartCanvas,
{
    page: P,
    canvas: C,
    store: SettingsStore<S>,
    extractor: SeriesExtractor,
    options: OverlayOptions,
    state: OverlayState,
    settings: Option<OverlaySettings>,
    panel: Option<SettingsPanel>,
    draft: Option<SettingsPanel>,
    chart: Option<C::Handle>,
}

impl<P, C, S> OverlayController<P, C, S>
where
    P: HostPage,
    C: ChartCanvas,
    S: KeyValueStore,
{
    /// Creates a controller for a freshly loaded page.
    pub fn new(page: P, canvas: C, store: S) -> OverlayController<P, C, S> {
        Self {
            page,
            canvas,
            store: SettingsStore::new(store),
            extractor: SeriesExtractor::default(),
            options: OverlayOptions::default(),
            state: OverlayState::Idle,
            settings: None,
            panel: None,
            draft: None,
            chart: None,
        }
    }

    /// Sets the extractor of the rating series.
    pub fn extractor(mut self, extractor: SeriesExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Sets the options of the overlay.
    pub fn options(mut self, options: OverlayOptions) -> Self {
        self.options = options;
        self
    }

    /// Handles a single event.
    pub fn handle(&mut self, event: PageEvent) -> Result<RenderOutcome> {
        debug!(?event, state = ?self.state, "handling a page event");

        match event {
            PageEvent::StartupTimer | PageEvent::ContentChanged => self.render(),
            PageEvent::Edit(panel) => {
                self.draft = Some(panel);
                Ok(RenderOutcome::Deferred)
            }
            PageEvent::Update => self.update(),
            PageEvent::Navigate => {
                self.reset()?;
                Ok(RenderOutcome::Skipped)
            }
        }
    }

    /// Handles every event until the source runs dry.
    ///
    /// A failing event is logged and the following ones are still handled.
    pub fn run<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = PageEvent>,
    {
        for event in events {
            if let Err(error) = self.handle(event) {
                error!(%error, "could not handle the page event");
            }
        }
    }

    fn render(&mut self) -> Result<RenderOutcome> {
        self.state = OverlayState::Armed;

        let data = self.page.chart_data();
        let Some(series) = self.extractor.extract(data.as_deref()) else {
            self.state = OverlayState::Idle;
            return Ok(RenderOutcome::Skipped);
        };
        let series = self.options.date_range.apply(series);

        let store = &self.store;
        let settings = *self.settings.get_or_insert_with(|| store.load());

        let panel = self
            .panel
            .get_or_insert_with(|| SettingsPanel::from_settings(&settings));
        if !self.page.has_panel() {
            self.page.mount_panel(panel)?;
        }

        let spec = ChartConfigBuilder::new(&series)
            .settings(&settings)
            .raw_label(format!("Raw {}", self.extractor.kind().label()))
            .season_threshold(self.options.season_threshold)
            .hide_raw(self.options.hide_raw)
            .build();

        self.page.hide_host_chart()?;

        if let Some(chart) = self.chart.take() {
            chart.destroy()?;
        }

        let view = OverlayView {
            spec,
            panel: self.draft.clone().unwrap_or_else(|| panel.clone()),
        };
        self.chart = Some(self.canvas.create(&view)?);
        self.state = OverlayState::Rendered;

        info!(
            points = series.len(),
            datasets = view.spec.data.datasets.len(),
            x_axis = ?settings.x_axis_mode,
            "rendered the overlay chart"
        );

        Ok(RenderOutcome::Rendered)
    }

    fn update(&mut self) -> Result<RenderOutcome> {
        let panel = match self.draft.take() {
            Some(draft) => draft,
            None => self
                .panel
                .clone()
                .unwrap_or_else(|| SettingsPanel::from_settings(&self.store.load())),
        };

        let settings = panel.to_settings();
        self.store.save(&settings)?;

        self.settings = Some(settings);
        self.panel = Some(panel);

        self.render()
    }

    fn reset(&mut self) -> Result<()> {
        self.state = OverlayState::Idle;
        self.settings = None;
        self.panel = None;
        self.draft = None;

        if let Some(chart) = self.chart.take() {
            chart.destroy()?;
        }

        Ok(())
    }

    /// The state of the controller.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// The settings in effect on the current page, once loaded.
    pub fn settings(&self) -> Option<&OverlaySettings> {
        self.settings.as_ref()
    }

    /// The panel edits that wait for the next update.
    pub fn draft(&self) -> Option<&SettingsPanel> {
        self.draft.as_ref()
    }

    /// The host page.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// The chart canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The storage the settings are persisted in.
    pub fn settings_store(&self) -> &SettingsStore<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use mrlens_series::AverageKind;
    use mrlens_series::LineConfig;
    use mrlens_series::MemoryStore;
    use mrlens_series::XAxisMode;
    use mrlens_series::settings::SETTINGS_KEY;

    use super::*;
    use crate::error::VisError;

    const HOST_DATA: &str = r#"{"data":{"datasets":[{"label":"MR","yAxisID":"y","data":[
        {"x":"2025-08-01T10:00:00+09:00","y":10},
        {"x":"2025-08-02T10:00:00+09:00","y":null},
        {"x":"2025-08-03T10:00:00+09:00","y":20},
        {"x":"2025-08-04T10:00:00+09:00","y":30},
        {"x":"2025-08-05T10:00:00+09:00","y":40},
        {"x":"2025-08-06T10:00:00+09:00","y":50}
    ]}]}}"#;

    #[derive(Default)]
    struct FakePage {
        data: Option<String>,
        mounted: usize,
        hidden: bool,
    }

    impl FakePage {
        fn with_data() -> FakePage {
            Self {
                data: Some(HOST_DATA.to_owned()),
                ..Self::default()
            }
        }
    }

    impl HostPage for FakePage {
        fn chart_data(&self) -> Option<String> {
            self.data.clone()
        }

        fn has_panel(&self) -> bool {
            self.mounted > 0
        }

        fn mount_panel(&mut self, _: &SettingsPanel) -> Result<()> {
            self.mounted += 1;
            Ok(())
        }

        fn hide_host_chart(&mut self) -> Result<()> {
            self.hidden = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeCanvas {
        live: Rc<Cell<usize>>,
        views: Vec<OverlayView>,
        fail: bool,
    }

    impl ChartCanvas for FakeCanvas {
        type Handle = FakeChart;

        fn create(&mut self, view: &OverlayView) -> Result<FakeChart> {
            if self.fail {
                return Err(VisError::Canvas(String::from("no context")));
            }

            self.live.set(self.live.get() + 1);
            self.views.push(view.clone());
            Ok(FakeChart {
                live: Rc::clone(&self.live),
            })
        }
    }

    struct FakeChart {
        live: Rc<Cell<usize>>,
    }

    impl ChartHandle for FakeChart {
        fn destroy(self) -> Result<()> {
            self.live.set(self.live.get() - 1);
            Ok(())
        }
    }

    type Controller = OverlayController<FakePage, FakeCanvas, MemoryStore>;

    fn controller(page: FakePage) -> Controller {
        OverlayController::new(page, FakeCanvas::default(), MemoryStore::new())
    }

    fn last_labels(controller: &Controller) -> Vec<String> {
        controller
            .canvas()
            .views
            .last()
            .map(|view| view.spec.labels().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn page_without_data_is_left_alone() -> Result<()> {
        let mut controller = controller(FakePage::default());

        assert_eq!(controller.handle(PageEvent::StartupTimer)?, RenderOutcome::Skipped);

        assert_eq!(controller.state(), OverlayState::Idle);
        assert_eq!(controller.page().mounted, 0);
        assert!(!controller.page().hidden);
        assert!(controller.canvas().views.is_empty());
        Ok(())
    }

    #[test]
    fn startup_renders_with_default_settings() -> Result<()> {
        let mut controller = controller(FakePage::with_data());

        assert_eq!(controller.handle(PageEvent::StartupTimer)?, RenderOutcome::Rendered);

        assert_eq!(controller.state(), OverlayState::Rendered);
        assert_eq!(controller.settings(), Some(&OverlaySettings::default()));
        assert!(controller.page().hidden);
        assert_eq!(controller.page().mounted, 1);
        assert_eq!(last_labels(&controller), ["Raw MR", "EMA(300)"]);

        let view = &controller.canvas().views[0];
        assert_eq!(
            view.spec.data.datasets[0].values(),
            [Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)]
        );
        Ok(())
    }

    #[test]
    fn rerenders_keep_a_single_chart() -> Result<()> {
        let mut controller = controller(FakePage::with_data());

        controller.run([
            PageEvent::StartupTimer,
            PageEvent::ContentChanged,
            PageEvent::ContentChanged,
        ]);

        assert_eq!(controller.canvas().views.len(), 3);
        assert_eq!(controller.canvas().live.get(), 1);
        assert_eq!(controller.page().mounted, 1);
        Ok(())
    }

    #[test]
    fn edits_wait_for_update() -> Result<()> {
        let mut controller = controller(FakePage::with_data());
        controller.handle(PageEvent::StartupTimer)?;

        let mut panel = SettingsPanel::default();
        panel.set_line(0, true, AverageKind::Sma, "3");
        panel.set_x_axis_mode(XAxisMode::SequenceIndex);

        assert_eq!(controller.handle(PageEvent::Edit(panel))?, RenderOutcome::Deferred);
        assert_eq!(controller.canvas().views.len(), 1);
        assert!(controller.settings_store().store().get(SETTINGS_KEY)?.is_none());

        controller.handle(PageEvent::ContentChanged)?;
        assert_eq!(last_labels(&controller), ["Raw MR", "EMA(300)"]);

        assert_eq!(controller.handle(PageEvent::Update)?, RenderOutcome::Rendered);

        assert!(controller.draft().is_none());
        assert_eq!(last_labels(&controller), ["Raw MR", "SMA(3)"]);
        let view = controller.canvas().views.last().unwrap();
        assert_eq!(
            view.spec.data.datasets[1].values(),
            [None, None, Some(20.0), Some(30.0), Some(40.0)]
        );
        assert_eq!(view.spec.options.scales.x.max, Some(5.0));

        let saved = controller.settings_store().load();
        assert_eq!(saved.lines[0], LineConfig::new(true, AverageKind::Sma, 3));
        assert_eq!(saved.x_axis_mode, XAxisMode::SequenceIndex);
        Ok(())
    }

    #[test]
    fn update_saves_even_without_data() -> Result<()> {
        let mut controller = controller(FakePage::default());

        let mut panel = SettingsPanel::default();
        panel.set_enabled(1, true);
        controller.handle(PageEvent::Edit(panel))?;

        assert_eq!(controller.handle(PageEvent::Update)?, RenderOutcome::Skipped);
        assert!(controller.settings_store().load().lines[1].enabled);
        Ok(())
    }

    #[test]
    fn navigation_tears_down_the_page() -> Result<()> {
        let mut controller = controller(FakePage::with_data());
        controller.handle(PageEvent::StartupTimer)?;
        controller.handle(PageEvent::Edit(SettingsPanel::default()))?;

        controller.handle(PageEvent::Navigate)?;

        assert_eq!(controller.state(), OverlayState::Idle);
        assert_eq!(controller.canvas().live.get(), 0);
        assert!(controller.settings().is_none());
        assert!(controller.draft().is_none());
        Ok(())
    }

    #[test]
    fn failing_events_do_not_stop_the_loop() {
        let mut controller = controller(FakePage::with_data());
        controller.canvas.fail = true;

        controller.run([PageEvent::StartupTimer, PageEvent::Navigate]);

        assert_eq!(controller.state(), OverlayState::Idle);
        assert!(controller.canvas().views.is_empty());
    }
}
