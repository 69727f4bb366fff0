use crate::models::chart::{BoundingBox, ScreenPoint};
use crate::models::event::{format_signed_percent, Event};
use crate::models::input::PressTarget;
use crate::models::point::Point;
use crate::models::settings::Settings;
use crate::models::time::ChartTime;
use crate::models::view::{EventCard, Placement, PopupState, PopupView};

/// Builds and places the floating event popup.
///
/// Lookup is exact: the popup shows only when a loaded day matches the
/// requested time and that day carries events. Anything else hides it.
///
/// Placement: top edge at the pointer's `y`, left edge `margin` pixels to
/// the right of the pointer. If that would push the popup past the right
/// edge of the surface, it flips to `margin` pixels left of the pointer.
pub struct OverlayService {
    margin: f64,
    narrow_breakpoint: f64,
    width_narrow: f64,
    width_wide: f64,
}

impl OverlayService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            margin: settings.popup_margin,
            narrow_breakpoint: settings.narrow_breakpoint,
            width_narrow: settings.popup_width_narrow,
            width_wide: settings.popup_width_wide,
        }
    }

    /// Popup width for the current viewport.
    pub fn popup_width(&self, viewport_width: f64) -> f64 {
        if viewport_width < self.narrow_breakpoint {
            self.width_narrow
        } else {
            self.width_wide
        }
    }

    /// Show the events of the day at `time`, anchored at `anchor`.
    pub fn show_popup(
        &self,
        anchor: ScreenPoint,
        time: &ChartTime,
        points: &[Point],
        bounds: &BoundingBox,
        viewport_width: f64,
    ) -> PopupState {
        let Some(ts) = time.to_unix() else {
            return PopupState::Hidden;
        };
        let Some(events) = find_events(points, ts) else {
            return PopupState::Hidden;
        };

        let width = self.popup_width(viewport_width);
        let (left, placement) = self.place(anchor, bounds, width);

        PopupState::Visible(PopupView {
            time: ts,
            left,
            top: anchor.y,
            width,
            placement,
            cards: events.iter().map(event_card).collect(),
        })
    }

    /// Horizontal position for a popup of `width` next to `anchor`.
    pub fn place(&self, anchor: ScreenPoint, bounds: &BoundingBox, width: f64) -> (f64, Placement) {
        let right_side = anchor.x + self.margin;
        if right_side + width > bounds.right() {
            (anchor.x - self.margin - width, Placement::Left)
        } else {
            (right_side, Placement::Right)
        }
    }

    /// Whether a press at `target` dismisses the popup.
    pub fn dismisses(target: PressTarget) -> bool {
        target == PressTarget::Outside
    }
}

/// Events of the point whose day is exactly `ts`. Points are sorted by time.
pub fn find_events(points: &[Point], ts: i64) -> Option<&[Event]> {
    points
        .binary_search_by_key(&ts, |p| p.time)
        .ok()
        .and_then(|idx| points[idx].events())
}

/// Render one event. The bar treats `|value|` as a 0–100 scale.
pub fn event_card(event: &Event) -> EventCard {
    EventCard {
        title: event.title.clone(),
        direction: event.direction(),
        value_text: format_signed_percent(event.value),
        bar_width: event.value.abs().min(100.0),
    }
}
