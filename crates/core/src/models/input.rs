use serde::{Deserialize, Serialize};

use super::chart::{ScreenPoint, VisibleRange};
use super::time::ChartTime;

/// How the user drives the dashboard. Resolved once by the host at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Mouse or pen with continuous hover
    #[default]
    Pointer,
    /// Touch screen, discrete taps only
    Touch,
}

/// Where a press, click or tap landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressTarget {
    Surface,
    Popup,
    Outside,
}

/// Crosshair movement reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerMove {
    /// Pointer position in client pixels; `None` once it leaves the plot
    pub point: Option<ScreenPoint>,

    /// Time under the pointer as the surface reports it
    pub time: Option<ChartTime>,

    /// Series value the surface has at that time, if any
    pub value: Option<f64>,
}

impl PointerMove {
    /// The pointer has left the plottable area.
    pub fn outside() -> Self {
        Self::default()
    }

    pub fn at(point: ScreenPoint, time: impl Into<ChartTime>, value: Option<f64>) -> Self {
        Self {
            point: Some(point),
            time: Some(time.into()),
            value,
        }
    }
}

/// Start of a touch, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchStart {
    pub point: ScreenPoint,
    pub target: PressTarget,
}

/// Press or click anywhere in the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Press {
    pub point: ScreenPoint,
    pub target: PressTarget,
}

/// Everything the dashboard reacts to after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    PointerMove(PointerMove),
    /// The surface scrolled or zoomed; `None` when it has no data range
    VisibleRangeChange(Option<VisibleRange>),
    TouchStart(TouchStart),
    Press(Press),
    /// New viewport width in pixels
    Resize(f64),
}

impl Notification {
    pub fn topic(&self) -> Topic {
        match self {
            Notification::PointerMove(_) => Topic::PointerMove,
            Notification::VisibleRangeChange(_) => Topic::VisibleRangeChange,
            Notification::TouchStart(_) => Topic::TouchStart,
            Notification::Press(_) => Topic::Press,
            Notification::Resize(_) => Topic::Resize,
        }
    }
}

/// Subscription channel of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    PointerMove,
    VisibleRangeChange,
    TouchStart,
    Press,
    Resize,
}

impl Topic {
    /// Channels a dashboard listens on in the given input mode.
    pub fn for_mode(mode: InputMode) -> &'static [Topic] {
        match mode {
            InputMode::Pointer => &[Topic::PointerMove, Topic::Press, Topic::Resize],
            InputMode::Touch => &[
                Topic::PointerMove,
                Topic::VisibleRangeChange,
                Topic::TouchStart,
                Topic::Press,
                Topic::Resize,
            ],
        }
    }
}
