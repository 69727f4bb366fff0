use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mover::title_or_unknown;

/// Direction of a signed percentage move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Strictly positive change
    Up,
    /// Strictly negative change
    Down,
    /// Zero (or not a number)
    Neutral,
}

impl Direction {
    /// Classify a signed value. `NaN` and both zeros are neutral.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Up
        } else if value < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }

    /// Indicator glyph shown next to the percentage. Neutral has none.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            Direction::Up => Some("▲"),
            Direction::Down => Some("▼"),
            Direction::Neutral => None,
        }
    }

    /// Class name the host renderer styles the card or row with.
    pub fn class_name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Neutral => write!(f, "Neutral"),
        }
    }
}

/// A discrete annotated move attached to one day of the series.
///
/// Events have no lifecycle of their own: they live inside the
/// [`Point`](super::point::Point) that carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Headline of the market that moved
    pub title: String,

    /// Signed percentage change (e.g. `-12.5` means down 12.5%)
    pub value: f64,
}

impl Event {
    pub fn new(title: impl Into<String>, value: f64) -> Self {
        Self {
            title: title.into(),
            value,
        }
    }

    /// Title falls back to [`UNKNOWN_QUESTION`](super::mover::UNKNOWN_QUESTION)
    /// when it is missing, `null` or blank.
    pub fn from_raw(raw: RawEvent) -> Self {
        Self {
            title: title_or_unknown(raw.title),
            value: raw.value,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.value)
    }
}

/// An event exactly as it appears in the series resource.
///
/// Upstream copies the market question into `title`, which is `null` for
/// markets scraped without one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: Option<Value>,

    pub value: f64,
}

/// Format a signed percentage with two decimals: `+5.00%`, `-10.00%`, `0.00%`.
pub fn format_signed_percent(value: f64) -> String {
    match Direction::of(value) {
        Direction::Up => format!("+{value:.2}%"),
        Direction::Down => format!("{value:.2}%"),
        Direction::Neutral => format!("{:.2}%", 0.0),
    }
}
