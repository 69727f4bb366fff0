use serde::{Deserialize, Serialize};

use super::event::Direction;
use crate::errors::CoreError;

/// A single `{time, value}` datum handed to the rendering surface.
///
/// The core computes the numbers; the surface only draws them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesDatum {
    pub time: i64,
    pub value: f64,
}

/// A marker drawn on the series for a day that carries events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub time: i64,

    /// Direction of the day's largest move
    pub direction: Direction,
}

/// The time window currently shown on the rendering surface (Unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub from: i64,
    pub to: i64,
}

/// Named windows offered by the range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeWindow {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl RangeWindow {
    /// Every window, in the order the controls are laid out.
    pub const ALL: [RangeWindow; 4] = [
        RangeWindow::OneMonth,
        RangeWindow::ThreeMonths,
        RangeWindow::OneYear,
        RangeWindow::All,
    ];

    /// Calendar months to step back from the last day. `None` for `All`.
    pub fn months_back(&self) -> Option<u32> {
        match self {
            RangeWindow::OneMonth => Some(1),
            RangeWindow::ThreeMonths => Some(3),
            RangeWindow::OneYear => Some(12),
            RangeWindow::All => None,
        }
    }

    /// Short key used by controls and configuration.
    pub fn key(&self) -> &'static str {
        match self {
            RangeWindow::OneMonth => "1m",
            RangeWindow::ThreeMonths => "3m",
            RangeWindow::OneYear => "1y",
            RangeWindow::All => "all",
        }
    }
}

impl std::fmt::Display for RangeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeWindow::OneMonth => write!(f, "1M"),
            RangeWindow::ThreeMonths => write!(f, "3M"),
            RangeWindow::OneYear => write!(f, "1Y"),
            RangeWindow::All => write!(f, "All"),
        }
    }
}

impl std::str::FromStr for RangeWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1-month" | "1month" => Ok(RangeWindow::OneMonth),
            "3m" | "3-month" | "3month" => Ok(RangeWindow::ThreeMonths),
            "1y" | "1-year" | "1year" | "12m" => Ok(RangeWindow::OneYear),
            "all" | "max" => Ok(RangeWindow::All),
            other => Err(CoreError::ValidationError(format!(
                "Unknown range window: {other:?}"
            ))),
        }
    }
}

/// A position in client (viewport) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the rendering surface in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Projected horizontal position of an event-bearing day.
///
/// Transient: rebuilt from the surface every time the visible range moves.
/// `x` is relative to the surface's left edge, `None` when off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerHitbox {
    pub time: i64,
    pub x: Option<f64>,
}
