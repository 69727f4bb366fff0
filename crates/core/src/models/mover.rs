use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{format_signed_percent, Direction};

/// Title shown for snapshot entries whose question is missing.
pub const UNKNOWN_QUESTION: &str = "Unknown";

/// `value` when it is a non-blank string, otherwise [`UNKNOWN_QUESTION`].
pub fn title_or_unknown(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => UNKNOWN_QUESTION.to_string(),
    }
}

/// One entry of a day's top-movers snapshot, as stored upstream.
///
/// Fields are kept undecoded so a wrong-typed one never costs the entry its
/// place; [`Mover::from_raw`] decides what is usable. Only `priceChange`
/// is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMover {
    #[serde(default)]
    pub question: Option<Value>,

    #[serde(default)]
    pub price_change: Option<Value>,

    #[serde(default)]
    pub condition_id: Option<Value>,

    #[serde(default)]
    pub token_id: Option<Value>,

    #[serde(default)]
    pub open_interest: Option<Value>,
}

/// A market's price change for the day. Always has a price change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub question: String,

    /// Signed percentage
    pub price_change: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
}

impl Mover {
    pub fn new(question: impl Into<String>, price_change: f64) -> Self {
        Self {
            question: question.into(),
            price_change,
            condition_id: None,
            token_id: None,
            open_interest: None,
        }
    }

    /// Validate a raw entry. `None` if it has no usable price change.
    pub fn from_raw(raw: RawMover) -> Option<Self> {
        let price_change = finite_number(raw.price_change)?;
        Some(Self {
            question: title_or_unknown(raw.question),
            price_change,
            condition_id: identifier(raw.condition_id),
            token_id: identifier(raw.token_id),
            open_interest: finite_number(raw.open_interest),
        })
    }

    pub fn direction(&self) -> Direction {
        Direction::of(self.price_change)
    }
}

fn finite_number(value: Option<Value>) -> Option<f64> {
    value?.as_f64().filter(|n| n.is_finite())
}

// Numeric ids are kept as their decimal text.
fn identifier(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A mover placed in the ranked panel.
///
/// `display_rank` is the 1-based position in the snapshot as received and is
/// what the `#N` label shows. `sort_rank` is the 1-based position after
/// ordering by descending magnitude, i.e. the row it is rendered on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMover {
    pub display_rank: usize,
    pub sort_rank: usize,
    pub mover: Mover,
}

impl RankedMover {
    /// `#N` label built from the received position.
    pub fn label(&self) -> String {
        format!("#{}", self.display_rank)
    }

    pub fn direction(&self) -> Direction {
        self.mover.direction()
    }

    pub fn change_text(&self) -> String {
        format_signed_percent(self.mover.price_change)
    }
}
