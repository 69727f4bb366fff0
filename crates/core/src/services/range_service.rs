use chrono::Months;

use crate::models::chart::{RangeWindow, VisibleRange};
use crate::models::point::Point;
use crate::models::time::{day_start_unix, unix_to_day};
use crate::providers::surface::RenderingSurface;

/// What a window selection asks of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// Show exactly this range
    Explicit(VisibleRange),
    /// Let the surface fit its whole data extent
    FitContent,
}

/// Translates named windows into visible ranges.
///
/// Windows end on the last loaded day and start the same day-of-month
/// `n` calendar months earlier. Days that do not exist in the target month
/// clamp to its last day (31 March minus one month is 29 February in a leap
/// year).
pub struct RangeService;

impl RangeService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `window` against the loaded points. `None` when there are no
    /// points, in which case nothing should change.
    pub fn resolve(&self, window: RangeWindow, points: &[Point]) -> Option<RangeRequest> {
        let last = points.last()?;
        match window.months_back() {
            None => Some(RangeRequest::FitContent),
            Some(months) => {
                let to = last.time;
                let from = Self::months_before(to, months)?;
                Some(RangeRequest::Explicit(VisibleRange { from, to }))
            }
        }
    }

    /// Unix seconds of UTC midnight `months` calendar months before `to`'s day.
    pub fn months_before(to: i64, months: u32) -> Option<i64> {
        let day = unix_to_day(to)?;
        let start = day.checked_sub_months(Months::new(months))?;
        Some(day_start_unix(start))
    }

    /// Resolve `window` and apply it to `surface`.
    /// Returns the request that was applied, or `None` for a no-op.
    pub fn apply(
        &self,
        window: RangeWindow,
        points: &[Point],
        surface: &mut dyn RenderingSurface,
    ) -> Option<RangeRequest> {
        let request = self.resolve(window, points)?;
        match request {
            RangeRequest::Explicit(range) => surface.set_visible_range(range),
            RangeRequest::FitContent => surface.fit_content(),
        }
        Some(request)
    }
}

impl Default for RangeService {
    fn default() -> Self {
        Self::new()
    }
}
