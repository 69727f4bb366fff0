use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use chaos_meter_core::errors::CoreError;
use chaos_meter_core::models::chart::{
    BoundingBox, Marker, RangeWindow, ScreenPoint, SeriesDatum, VisibleRange,
};
use chaos_meter_core::models::input::{
    InputMode, Notification, PointerMove, Press, PressTarget, TouchStart,
};
use chaos_meter_core::models::settings::Settings;
use chaos_meter_core::models::time::{day_start_unix, ChartTime};
use chaos_meter_core::models::view::{Placement, PopupState};
use chaos_meter_core::providers::surface::RenderingSurface;
use chaos_meter_core::providers::traits::DataSource;
use chaos_meter_core::services::notifications::NotificationBus;
use chaos_meter_core::Dashboard;

const DAY: i64 = 86_400;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ts(y: i32, m: u32, day: u32) -> i64 {
    day_start_unix(d(y, m, day))
}

// ═══════════════════════════════════════════════════════════════════
// Mock Source (for testing without real I/O)
// ═══════════════════════════════════════════════════════════════════

struct MockSource {
    series: Result<Value, String>,
    movers: HashMap<NaiveDate, Value>,
}

impl MockSource {
    fn new(series: Value) -> Self {
        Self {
            series: Ok(series),
            movers: HashMap::new(),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            series: Err(message.to_string()),
            movers: HashMap::new(),
        }
    }

    fn with_movers(mut self, date: NaiveDate, movers: Value) -> Self {
        self.movers.insert(date, movers);
        self
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn name(&self) -> &str {
        "MockSource"
    }

    async fn fetch_series(&self) -> Result<Value, CoreError> {
        self.series.clone().map_err(CoreError::Network)
    }

    async fn fetch_movers(&self, date: NaiveDate) -> Result<Option<Value>, CoreError> {
        Ok(self.movers.get(&date).cloned())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mock Surface: records what the dashboard pushed into it
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct RecordingSurface {
    series: Vec<SeriesDatum>,
    markers: Vec<Marker>,
    visible: Option<VisibleRange>,
    fit_calls: usize,
}

impl RenderingSurface for RecordingSurface {
    fn set_series(&mut self, data: &[SeriesDatum]) {
        self.series = data.to_vec();
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }

    fn set_visible_range(&mut self, range: VisibleRange) {
        self.visible = Some(range);
    }

    fn fit_content(&mut self) {
        self.fit_calls += 1;
        self.visible = match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) => Some(VisibleRange {
                from: first.time,
                to: last.time,
            }),
            _ => None,
        };
    }

    /// 1000px wide, linear over the visible range.
    fn time_to_coordinate(&self, time: i64) -> Option<f64> {
        let range = self.visible?;
        if time < range.from || time > range.to || range.from == range.to {
            return None;
        }
        Some((time - range.from) as f64 / (range.to - range.from) as f64 * 1000.0)
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1000.0, 400.0)
    }
}

/// 2024-02-01 ..= 2024-03-15, events on 2024-03-05 (+5) and 2024-03-12 (-20).
fn series_json() -> Value {
    let mut records = Vec::new();
    let mut day = d(2024, 2, 1);
    while day <= d(2024, 3, 15) {
        let key = day.format("%Y-%m-%d").to_string();
        let mut record = json!({"time": key, "value": 10.0});
        if day == d(2024, 3, 5) {
            record["events"] = json!([{"title": "X", "value": 5}]);
        }
        if day == d(2024, 3, 12) {
            record["events"] = json!([{"title": "Crash", "value": -20}]);
        }
        records.push(record);
        day = day.succ_opt().unwrap();
    }
    if let Some(last) = records.last_mut() {
        last["value"] = json!(12.5);
    }
    Value::Array(records)
}

async fn dashboard(mode: InputMode) -> Dashboard<RecordingSurface> {
    let source = MockSource::new(series_json()).with_movers(
        d(2024, 3, 15),
        json!([
            {"question": "A", "priceChange": 2},
            {"question": "B", "priceChange": -10},
            {"question": "C", "priceChange": 5}
        ]),
    );
    Dashboard::initialize(
        Box::new(source),
        RecordingSurface::default(),
        Settings::default(),
        mode,
        1280.0,
    )
    .await
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Startup
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn startup_wires_surface_and_view() {
    let dash = dashboard(InputMode::Pointer).await;

    assert_eq!(dash.points().len(), 44);
    assert_eq!(dash.surface().series.len(), 44);
    assert_eq!(dash.surface().markers.len(), 2);
    // Default window: three calendar months back from the last day.
    assert_eq!(
        dash.surface().visible,
        Some(VisibleRange { from: ts(2023, 12, 15), to: ts(2024, 3, 15) })
    );
    assert_eq!(dash.view().active_window(), Some(RangeWindow::ThreeMonths));
    assert_eq!(dash.view().legend.value_text, "12.50%");
    assert_eq!(dash.view().popup, PopupState::Hidden);
    assert!(dash.view().movers.is_empty());
}

#[tokio::test]
async fn fatal_series_failure_aborts() {
    let result = Dashboard::initialize(
        Box::new(MockSource::failing("connection refused")),
        RecordingSurface::default(),
        Settings::default(),
        InputMode::Pointer,
        1280.0,
    )
    .await;
    assert!(matches!(result, Err(CoreError::Network(_))));
}

#[tokio::test]
async fn malformed_series_aborts() {
    let result = Dashboard::initialize(
        Box::new(MockSource::new(json!({"not": "an array"}))),
        RecordingSurface::default(),
        Settings::default(),
        InputMode::Pointer,
        1280.0,
    )
    .await;
    assert!(matches!(result, Err(CoreError::InvalidSeries(_))));
}

#[tokio::test]
async fn invalid_settings_abort() {
    let settings = Settings {
        touch_threshold: -1.0,
        ..Default::default()
    };
    let result = Dashboard::initialize(
        Box::new(MockSource::new(series_json())),
        RecordingSurface::default(),
        settings,
        InputMode::Touch,
        1280.0,
    )
    .await;
    assert!(matches!(result, Err(CoreError::ValidationError(_))));
}

#[tokio::test]
async fn empty_series_leaves_windows_untouched() {
    let mut dash = Dashboard::initialize(
        Box::new(MockSource::new(json!([]))),
        RecordingSurface::default(),
        Settings::default(),
        InputMode::Touch,
        1280.0,
    )
    .await
    .unwrap();

    assert_eq!(dash.view().active_window(), None);
    assert!(!dash.select_window(RangeWindow::OneMonth));
    assert_eq!(dash.surface().visible, None);
    assert_eq!(dash.view().legend.value_text, "--");
    assert!(dash.hit_index().is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Range selection
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn window_selection_is_exclusive() {
    let mut dash = dashboard(InputMode::Pointer).await;

    assert!(dash.select_window(RangeWindow::OneMonth));
    assert_eq!(
        dash.surface().visible,
        Some(VisibleRange { from: ts(2024, 2, 15), to: ts(2024, 3, 15) })
    );
    assert_eq!(dash.view().active_window(), Some(RangeWindow::OneMonth));
    assert_eq!(dash.view().windows.iter().filter(|c| c.active).count(), 1);

    assert!(dash.select_window_by_name("all").unwrap());
    assert_eq!(dash.surface().fit_calls, 1);
    assert_eq!(dash.view().active_window(), Some(RangeWindow::All));
}

#[tokio::test]
async fn unknown_window_name_is_rejected() {
    let mut dash = dashboard(InputMode::Pointer).await;
    assert!(dash.select_window_by_name("2w").is_err());
    assert_eq!(dash.view().active_window(), Some(RangeWindow::ThreeMonths));
}

// ═══════════════════════════════════════════════════════════════════
// Pointer mode
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn hover_updates_legend_and_popup() {
    let mut dash = dashboard(InputMode::Pointer).await;
    let t = ts(2024, 3, 5);

    dash.dispatch(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(200.0, 120.0),
        t,
        Some(10.0),
    )));

    assert_eq!(dash.view().legend.value_text, "10.00%");
    let popup = dash.view().popup.view().expect("popup visible");
    assert_eq!(popup.time, t);
    assert_eq!(popup.cards.len(), 1);
    assert_eq!(popup.left, 216.0);
    assert_eq!(popup.top, 120.0);

    // Next day has no events.
    dash.dispatch(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(210.0, 120.0),
        t + DAY,
        Some(10.0),
    )));
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn leaving_plot_resets_legend_and_hides_popup() {
    let mut dash = dashboard(InputMode::Pointer).await;
    dash.dispatch(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(200.0, 120.0),
        ts(2024, 3, 5),
        Some(10.0),
    )));
    assert!(dash.view().popup.is_visible());

    dash.dispatch(&Notification::PointerMove(PointerMove::outside()));
    assert_eq!(dash.view().legend.value_text, "12.50%");
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn coarse_zoom_time_is_normalized() {
    let mut dash = dashboard(InputMode::Pointer).await;
    dash.dispatch(&Notification::PointerMove(PointerMove {
        point: Some(ScreenPoint::new(900.0, 40.0)),
        time: Some(ChartTime::BusinessDay { year: 2024, month: 3, day: 12 }),
        value: Some(10.0),
    }));

    let popup = dash.view().popup.view().expect("popup visible");
    assert_eq!(popup.time, ts(2024, 3, 12));
    assert_eq!(popup.placement, Placement::Left);
    assert_eq!(popup.cards[0].title, "Crash");
}

#[tokio::test]
async fn press_outside_dismisses() {
    let mut dash = dashboard(InputMode::Pointer).await;
    let hover = Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(200.0, 120.0),
        ts(2024, 3, 5),
        Some(10.0),
    ));
    dash.dispatch(&hover);

    for target in [PressTarget::Surface, PressTarget::Popup] {
        dash.dispatch(&Notification::Press(Press {
            point: ScreenPoint::new(0.0, 0.0),
            target,
        }));
        assert!(dash.view().popup.is_visible());
    }

    dash.dispatch(&Notification::Press(Press {
        point: ScreenPoint::new(2000.0, 0.0),
        target: PressTarget::Outside,
    }));
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn resize_replaces_popup_with_new_width() {
    let mut dash = dashboard(InputMode::Pointer).await;
    // 700 + 16 + 320 > 1000 flips left; 700 + 16 + 240 fits.
    dash.dispatch(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(700.0, 10.0),
        ts(2024, 3, 5),
        Some(10.0),
    )));
    assert_eq!(dash.view().popup.view().unwrap().placement, Placement::Left);

    dash.dispatch(&Notification::Resize(500.0));
    let popup = dash.view().popup.view().unwrap();
    assert_eq!(popup.width, 240.0);
    assert_eq!(popup.placement, Placement::Right);
    assert_eq!(dash.viewport_width(), 500.0);
}

#[tokio::test]
async fn pointer_mode_ignores_touch() {
    let mut dash = dashboard(InputMode::Pointer).await;
    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(0.0, 0.0),
        target: PressTarget::Surface,
    }));
    assert!(!dash.view().popup.is_visible());
    assert!(dash.hit_index().is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Touch mode
// ═══════════════════════════════════════════════════════════════════

/// x of `time` with the one-month window (2024-02-15 ..= 2024-03-15, 29 days).
fn x_in_month(time: i64) -> f64 {
    (time - ts(2024, 2, 15)) as f64 / (29 * DAY) as f64 * 1000.0
}

#[tokio::test]
async fn touch_index_built_at_startup() {
    let dash = dashboard(InputMode::Touch).await;
    let times: Vec<i64> = dash.hit_index().iter().map(|h| h.time).collect();
    assert_eq!(times, vec![ts(2024, 3, 5), ts(2024, 3, 12)]);
    assert!(dash.hit_index().iter().all(|h| h.x.is_some()));
}

#[tokio::test]
async fn tap_near_marker_shows_popup() {
    let mut dash = dashboard(InputMode::Touch).await;
    assert!(dash.select_window(RangeWindow::OneMonth));

    let x = x_in_month(ts(2024, 3, 5));
    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(x + 10.0, 300.0),
        target: PressTarget::Surface,
    }));

    let popup = dash.view().popup.view().expect("popup visible");
    assert_eq!(popup.time, ts(2024, 3, 5));
    assert_eq!(popup.top, 300.0);
}

#[tokio::test]
async fn tap_thirty_pixels_away_hides_popup() {
    let mut dash = dashboard(InputMode::Touch).await;
    dash.select_window(RangeWindow::OneMonth);

    let x = x_in_month(ts(2024, 3, 5));
    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(x + 10.0, 300.0),
        target: PressTarget::Surface,
    }));
    assert!(dash.view().popup.is_visible());

    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(x + 30.0, 300.0),
        target: PressTarget::Surface,
    }));
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn document_tap_outside_hides_popup() {
    let mut dash = dashboard(InputMode::Touch).await;
    dash.select_window(RangeWindow::OneMonth);
    let x = x_in_month(ts(2024, 3, 12));
    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(x, 50.0),
        target: PressTarget::Surface,
    }));
    assert!(dash.view().popup.is_visible());

    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(x, 50.0),
        target: PressTarget::Popup,
    }));
    assert!(dash.view().popup.is_visible());

    dash.dispatch(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(5.0, 900.0),
        target: PressTarget::Outside,
    }));
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn touch_mode_hover_only_drives_legend() {
    let mut dash = dashboard(InputMode::Touch).await;
    dash.dispatch(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(200.0, 120.0),
        ts(2024, 3, 5),
        Some(10.0),
    )));
    assert_eq!(dash.view().legend.value_text, "10.00%");
    assert!(!dash.view().popup.is_visible());
}

#[tokio::test]
async fn range_change_rebuilds_index_idempotently() {
    let mut dash = dashboard(InputMode::Touch).await;
    dash.surface_mut().set_visible_range(VisibleRange {
        from: ts(2024, 3, 1),
        to: ts(2024, 3, 11),
    });

    let change = Notification::VisibleRangeChange(dash.surface().visible);
    dash.dispatch(&change);
    let first = dash.hit_index().to_vec();
    assert_eq!(first[0].x, Some(400.0));
    assert_eq!(first[1].x, None);

    dash.dispatch(&change);
    assert_eq!(dash.hit_index(), first.as_slice());
}

// ═══════════════════════════════════════════════════════════════════
// Movers
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn movers_ranked_by_magnitude_labeled_by_position() {
    let mut dash = dashboard(InputMode::Pointer).await;
    let movers = dash.load_movers(d(2024, 3, 15)).await;

    let rows: Vec<(String, String)> = movers
        .iter()
        .map(|r| (r.mover.question.clone(), r.label()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("B".to_string(), "#2".to_string()),
            ("C".to_string(), "#3".to_string()),
            ("A".to_string(), "#1".to_string()),
        ]
    );
    assert_eq!(dash.view().movers.len(), 3);
}

#[tokio::test]
async fn missing_movers_snapshot_is_soft() {
    let mut dash = dashboard(InputMode::Pointer).await;
    dash.load_movers(d(2024, 3, 15)).await;
    assert_eq!(dash.view().movers.len(), 3);

    let movers = dash.load_movers(d(2024, 3, 16)).await;
    assert!(movers.is_empty());
    assert!(dash.view().movers.is_empty());
    // Chart state is unaffected.
    assert_eq!(dash.view().legend.value_text, "12.50%");
    assert_eq!(dash.points().len(), 44);
}

// ═══════════════════════════════════════════════════════════════════
// Notification bus wiring
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn attached_dashboard_reacts_to_bus() {
    let dash = Rc::new(RefCell::new(dashboard(InputMode::Pointer).await));
    let mut bus = NotificationBus::new();
    let ids = Dashboard::attach(&dash, &mut bus);
    assert_eq!(ids.len(), 3);

    let delivered = bus.publish(&Notification::PointerMove(PointerMove::at(
        ScreenPoint::new(200.0, 120.0),
        ts(2024, 3, 5),
        Some(10.0),
    )));
    assert_eq!(delivered, 1);
    assert!(dash.borrow().view().popup.is_visible());

    // Pointer mode does not subscribe to touch.
    let delivered = bus.publish(&Notification::TouchStart(TouchStart {
        point: ScreenPoint::new(0.0, 0.0),
        target: PressTarget::Outside,
    }));
    assert_eq!(delivered, 0);
    assert!(dash.borrow().view().popup.is_visible());

    for id in ids {
        assert!(bus.unsubscribe(id));
    }
    bus.publish(&Notification::PointerMove(PointerMove::outside()));
    assert!(dash.borrow().view().popup.is_visible());
}

#[tokio::test]
async fn dropped_dashboard_turns_handlers_into_noops() {
    let dash = Rc::new(RefCell::new(dashboard(InputMode::Touch).await));
    let mut bus = NotificationBus::new();
    Dashboard::attach(&dash, &mut bus);
    drop(dash);

    assert_eq!(bus.publish(&Notification::Resize(800.0)), 1);
}
