use serde::{Deserialize, Serialize};

use super::event::{Event, RawEvent};

/// One day of the unpredictability index.
///
/// Produced once by the series loader and never mutated afterwards.
/// Across a loaded sequence `time` is strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Unix seconds at UTC midnight of the day
    pub time: i64,

    /// Index value for the day (percentage)
    pub value: f64,

    /// Notable moves of the day. `None` when the day has none; never
    /// `Some` of an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

impl Point {
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value,
            events: None,
        }
    }

    /// Create a point with events attached. An empty list is stored as `None`.
    pub fn with_events(time: i64, value: f64, events: Vec<Event>) -> Self {
        Self {
            time,
            value,
            events: if events.is_empty() { None } else { Some(events) },
        }
    }

    /// The day's events, if it has any.
    pub fn events(&self) -> Option<&[Event]> {
        self.events.as_deref().filter(|e| !e.is_empty())
    }

    pub fn has_events(&self) -> bool {
        self.events().is_some()
    }
}

/// A record exactly as it appears in the series resource.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    /// `YYYY-MM-DD`
    pub time: String,

    pub value: RawValue,

    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

/// Upstream writers have emitted both numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to a finite real number.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}
