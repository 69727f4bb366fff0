pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use models::{
    chart::{MarkerHitbox, RangeWindow, ScreenPoint},
    input::{InputMode, Notification, PointerMove, Press, PressTarget, TouchStart, Topic},
    mover::RankedMover,
    point::Point,
    settings::Settings,
    time::ChartTime,
    view::{PopupState, ViewState},
};
use providers::{surface::RenderingSurface, traits::DataSource};
use services::{
    hit_test_service::HitTestService,
    legend_service::LegendService,
    movers_service::MoversService,
    notifications::{NotificationBus, SubscriptionId},
    overlay_service::OverlayService,
    range_service::RangeService,
    series_service::SeriesService,
};

use errors::CoreError;

/// Main entry point for the Chaos Meter core library.
///
/// Owns the loaded points, the rendering surface handle, every overlay
/// component and the resulting [`ViewState`]. It is built once at startup
/// and then driven by notifications, either directly through
/// [`dispatch`](Self::dispatch) or via a [`NotificationBus`] after
/// [`attach`](Self::attach).
#[must_use]
pub struct Dashboard<S: RenderingSurface> {
    settings: Settings,
    mode: InputMode,
    points: Vec<Point>,
    surface: S,
    source: Box<dyn DataSource>,
    range_service: RangeService,
    legend_service: LegendService,
    overlay_service: OverlayService,
    hit_test_service: HitTestService,
    movers_service: MoversService,
    view: ViewState,
    viewport_width: f64,
    /// Anchor and time of the popup currently shown, for re-placement on resize.
    last_popup: Option<(ScreenPoint, ChartTime)>,
}

impl<S: RenderingSurface> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("mode", &self.mode)
            .field("points", &self.points.len())
            .field("source", &self.source.name())
            .field("active_window", &self.view.active_window())
            .field("popup_visible", &self.view.popup.is_visible())
            .field("movers", &self.view.movers.len())
            .finish()
    }
}

impl<S: RenderingSurface> Dashboard<S> {
    /// Load the series and wire every component to it.
    ///
    /// Fails if the settings are invalid or the series cannot be loaded;
    /// nothing is drawn in that case. On success the surface has its data
    /// and markers, the default window is selected, the legend shows the
    /// latest value and, in touch mode, the hit-test index is built.
    pub async fn initialize(
        source: Box<dyn DataSource>,
        surface: S,
        settings: Settings,
        mode: InputMode,
        viewport_width: f64,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let series_service = SeriesService::new();
        let points = series_service.load(source.as_ref()).await?;

        let legend_service = LegendService::new(settings.legend_label.clone(), &points);
        let view = ViewState::new(legend_service.default_readout());

        let mut dashboard = Self {
            mode,
            range_service: RangeService::new(),
            overlay_service: OverlayService::new(&settings),
            hit_test_service: HitTestService::new(settings.touch_threshold),
            movers_service: MoversService::new(),
            legend_service,
            view,
            points,
            surface,
            source,
            viewport_width,
            last_popup: None,
            settings,
        };

        dashboard
            .surface
            .set_series(&series_service.series_data(&dashboard.points));
        dashboard
            .surface
            .set_markers(&series_service.markers(&dashboard.points));

        dashboard.apply_window(dashboard.settings.default_window);
        if dashboard.mode == InputMode::Touch {
            dashboard.rebuild_hit_index();
        }

        Ok(dashboard)
    }

    // ── Wiring ──────────────────────────────────────────────────────

    /// Subscribe `dashboard` to the topics of its input mode.
    ///
    /// Handlers hold a weak reference, so dropping the dashboard turns them
    /// into no-ops. A notification published while the dashboard is already
    /// handling one is dropped; every handler is idempotent, and the
    /// dashboard refreshes what it changed itself.
    pub fn attach(dashboard: &Rc<RefCell<Self>>, bus: &mut NotificationBus) -> Vec<SubscriptionId>
    where
        S: 'static,
    {
        let mode = dashboard.borrow().mode;
        Topic::for_mode(mode)
            .iter()
            .map(|&topic| {
                let weak = Rc::downgrade(dashboard);
                bus.subscribe(
                    topic,
                    Box::new(move |notification: &Notification| {
                        let Some(dashboard) = weak.upgrade() else {
                            return;
                        };
                        match dashboard.try_borrow_mut() {
                            Ok(mut dashboard) => dashboard.dispatch(notification),
                            Err(_) => log::debug!(
                                "Dropping {:?} notification: dashboard is busy",
                                notification.topic()
                            ),
                        };
                    }),
                )
            })
            .collect()
    }

    /// Handle one notification.
    pub fn dispatch(&mut self, notification: &Notification) {
        match notification {
            Notification::PointerMove(event) => self.on_pointer_move(event),
            Notification::VisibleRangeChange(_) => self.on_visible_range_change(),
            Notification::TouchStart(touch) => self.on_touch_start(touch),
            Notification::Press(press) => self.on_press(press),
            Notification::Resize(width) => self.on_resize(*width),
        }
    }

    // ── Range ───────────────────────────────────────────────────────

    /// Select a named window. Returns `false` (and changes nothing) when
    /// there are no points.
    pub fn select_window(&mut self, window: RangeWindow) -> bool {
        let applied = self.apply_window(window);
        if applied && self.mode == InputMode::Touch {
            self.rebuild_hit_index();
        }
        applied
    }

    /// [`select_window`](Self::select_window) by control key (`"1m"`, `"3m"`, `"1y"`, `"all"`).
    pub fn select_window_by_name(&mut self, name: &str) -> Result<bool, CoreError> {
        let window: RangeWindow = name.parse()?;
        Ok(self.select_window(window))
    }

    fn apply_window(&mut self, window: RangeWindow) -> bool {
        let applied = self
            .range_service
            .apply(window, &self.points, &mut self.surface)
            .is_some();
        if applied {
            self.view.activate_window(window);
        }
        applied
    }

    // ── Notification handlers ───────────────────────────────────────

    fn on_pointer_move(&mut self, event: &PointerMove) {
        self.view.legend = self.legend_service.on_pointer_move(event);

        if self.mode != InputMode::Pointer {
            return;
        }
        match (event.point, &event.time) {
            (Some(point), Some(time)) if time.to_unix().is_some() => {
                self.show_popup(point, time.clone());
            }
            _ => self.hide_popup(),
        }
    }

    fn on_visible_range_change(&mut self) {
        if self.mode == InputMode::Touch {
            self.rebuild_hit_index();
        }
    }

    fn on_touch_start(&mut self, touch: &TouchStart) {
        match touch.target {
            PressTarget::Surface if self.mode == InputMode::Touch => {
                let bounds = self.surface.bounding_box();
                match self.hit_test_service.resolve_tap(touch.point.x, &bounds) {
                    Some(time) => self.show_popup(touch.point, ChartTime::Timestamp(time)),
                    None => self.hide_popup(),
                }
            }
            PressTarget::Outside => self.hide_popup(),
            _ => {}
        }
    }

    fn on_press(&mut self, press: &Press) {
        if OverlayService::dismisses(press.target) {
            self.hide_popup();
        }
    }

    fn on_resize(&mut self, width: f64) {
        if !(width.is_finite() && width > 0.0) {
            log::debug!("Ignoring resize to invalid width {width}");
            return;
        }
        self.viewport_width = width;
        if let Some((anchor, time)) = self.last_popup.clone() {
            self.show_popup(anchor, time);
        }
    }

    // ── Popup ───────────────────────────────────────────────────────

    /// Show the popup for `time` anchored at `anchor`, or hide it if that
    /// day has no events.
    pub fn show_popup(&mut self, anchor: ScreenPoint, time: ChartTime) {
        let bounds = self.surface.bounding_box();
        let state = self.overlay_service.show_popup(
            anchor,
            &time,
            &self.points,
            &bounds,
            self.viewport_width,
        );
        self.last_popup = state.is_visible().then_some((anchor, time));
        self.view.popup = state;
    }

    pub fn hide_popup(&mut self) {
        self.last_popup = None;
        self.view.popup = PopupState::Hidden;
    }

    fn rebuild_hit_index(&mut self) {
        self.hit_test_service.rebuild(&self.points, &self.surface);
    }

    // ── Movers ──────────────────────────────────────────────────────

    /// Load the movers panel for `date`. A missing snapshot leaves the
    /// panel empty; this never fails.
    pub async fn load_movers(&mut self, date: NaiveDate) -> &[RankedMover] {
        self.view.movers = self
            .movers_service
            .load_movers(self.source.as_ref(), date)
            .await;
        &self.view.movers
    }

    /// Load the movers panel for today's local date.
    pub async fn load_todays_movers(&mut self) -> &[RankedMover] {
        let today = chrono::Local::now().date_naive();
        self.load_movers(today).await
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    #[must_use]
    pub fn hit_index(&self) -> &[MarkerHitbox] {
        self.hit_test_service.hitboxes()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
