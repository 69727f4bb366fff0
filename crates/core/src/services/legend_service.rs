use crate::models::input::PointerMove;
use crate::models::point::Point;
use crate::models::view::LegendReadout;

/// Shown when there is no value at all (empty series).
const NO_VALUE: &str = "--";

/// Mirrors the value under the pointer into the legend.
///
/// Idle, the legend shows the latest day's value. Every pointer move
/// recomputes the readout from scratch, so leaving the plot reverts it.
pub struct LegendService {
    label: String,
    latest: Option<f64>,
}

impl LegendService {
    pub fn new(label: impl Into<String>, points: &[Point]) -> Self {
        Self {
            label: label.into(),
            latest: points.last().map(|p| p.value),
        }
    }

    /// Readout when nothing is hovered.
    pub fn default_readout(&self) -> LegendReadout {
        self.readout(self.latest)
    }

    /// Readout for a pointer-move notification.
    pub fn on_pointer_move(&self, event: &PointerMove) -> LegendReadout {
        let valid_time = event.time.as_ref().and_then(|t| t.to_unix()).is_some();
        match event.value {
            Some(value) if valid_time && value.is_finite() => self.readout(Some(value)),
            _ => self.default_readout(),
        }
    }

    fn readout(&self, value: Option<f64>) -> LegendReadout {
        LegendReadout {
            label: self.label.clone(),
            value_text: value.map_or_else(|| NO_VALUE.to_string(), format_percent),
        }
    }
}

/// Two decimals and a percent sign, e.g. `12.30%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}
