use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chart::RangeWindow;
use crate::errors::CoreError;

/// Tunables for the overlay layer and the data layout it reads.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed label of the legend readout
    pub legend_label: String,

    /// Horizontal gap between pointer and popup, in pixels
    pub popup_margin: f64,

    /// Viewports narrower than this use `popup_width_narrow`
    pub narrow_breakpoint: f64,
    pub popup_width_narrow: f64,
    pub popup_width_wide: f64,

    /// Maximum tap-to-marker distance that still counts as a hit, in pixels
    pub touch_threshold: f64,

    /// Window selected at startup
    pub default_window: RangeWindow,

    /// Series resource, relative to the data root
    pub series_path: String,

    /// Directory of per-day movers snapshots (`{date}.json`), relative to the data root
    pub movers_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            legend_label: "Unpredictability Index".to_string(),
            popup_margin: 16.0,
            narrow_breakpoint: 640.0,
            popup_width_narrow: 240.0,
            popup_width_wide: 320.0,
            touch_threshold: 24.0,
            default_window: RangeWindow::ThreeMonths,
            series_path: "data/daily_scores.json".to_string(),
            movers_dir: "data/top10".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the overlay cannot lay out with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let positive = [
            ("narrow_breakpoint", self.narrow_breakpoint),
            ("popup_width_narrow", self.popup_width_narrow),
            ("popup_width_wide", self.popup_width_wide),
            ("touch_threshold", self.touch_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::ValidationError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(self.popup_margin.is_finite() && self.popup_margin >= 0.0) {
            return Err(CoreError::ValidationError(format!(
                "popup_margin must not be negative, got {}",
                self.popup_margin
            )));
        }
        if self.series_path.trim().is_empty() {
            return Err(CoreError::ValidationError("series_path is empty".into()));
        }
        if self.movers_dir.trim().is_empty() {
            return Err(CoreError::ValidationError("movers_dir is empty".into()));
        }
        Ok(())
    }

    /// Relative location of the movers snapshot for `date`
    /// (`{movers_dir}/YYYY-MM-DD.json`).
    pub fn movers_path(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}.json",
            self.movers_dir.trim_end_matches('/'),
            date.format("%Y-%m-%d")
        )
    }
}
