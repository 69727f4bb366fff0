use serde::{Deserialize, Serialize};

use super::chart::RangeWindow;
use super::event::Direction;
use super::mover::RankedMover;

/// Legend readout: a fixed label plus the value under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendReadout {
    pub label: String,

    /// Already formatted, e.g. `"12.34%"`
    pub value_text: String,
}

/// One event rendered inside the popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub title: String,
    pub direction: Direction,

    /// Signed percentage, e.g. `"+5.00%"`
    pub value_text: String,

    /// Fill of the magnitude bar, percent of the bar's width (0–100)
    pub bar_width: f64,
}

/// Which side of the pointer the popup sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Right,
    Left,
}

/// A visible popup, positioned in client pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupView {
    /// Day the popup describes (Unix seconds)
    pub time: i64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub placement: Placement,
    pub cards: Vec<EventCard>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum PopupState {
    #[default]
    Hidden,
    Visible(PopupView),
}

impl PopupState {
    pub fn is_visible(&self) -> bool {
        matches!(self, PopupState::Visible(_))
    }

    pub fn view(&self) -> Option<&PopupView> {
        match self {
            PopupState::Visible(view) => Some(view),
            PopupState::Hidden => None,
        }
    }
}

/// A range selector button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowControl {
    pub window: RangeWindow,
    pub active: bool,
}

/// Everything a host renderer needs to draw the dashboard chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub legend: LegendReadout,
    pub popup: PopupState,
    pub windows: Vec<WindowControl>,
    /// Top movers in render order
    pub movers: Vec<RankedMover>,
}

impl ViewState {
    pub fn new(legend: LegendReadout) -> Self {
        Self {
            legend,
            popup: PopupState::Hidden,
            windows: RangeWindow::ALL
                .iter()
                .map(|&window| WindowControl {
                    window,
                    active: false,
                })
                .collect(),
            movers: Vec::new(),
        }
    }

    /// Mark `window` active and every other control inactive.
    pub fn activate_window(&mut self, window: RangeWindow) {
        for control in &mut self.windows {
            control.active = control.window == window;
        }
    }

    pub fn active_window(&self) -> Option<RangeWindow> {
        self.windows.iter().find(|c| c.active).map(|c| c.window)
    }
}
