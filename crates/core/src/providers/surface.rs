use crate::models::chart::{BoundingBox, Marker, SeriesDatum, VisibleRange};

/// The external charting engine, seen from the overlay layer.
///
/// The engine owns time-axis projection, zoom/pan and drawing. The core
/// only pushes data into it, asks it to move its window, and queries its
/// projection. Notifications flow the other way through
/// [`NotificationBus`](crate::services::notifications::NotificationBus).
pub trait RenderingSurface {
    /// Replace the drawn series.
    fn set_series(&mut self, data: &[SeriesDatum]);

    /// Replace the markers drawn on the series.
    fn set_markers(&mut self, markers: &[Marker]);

    /// Show exactly `range`.
    fn set_visible_range(&mut self, range: VisibleRange);

    /// Fit the time axis to the full extent of the data.
    fn fit_content(&mut self);

    /// Horizontal pixel offset of `time` from the surface's left edge,
    /// or `None` if it is not currently projectable.
    fn time_to_coordinate(&self, time: i64) -> Option<f64>;

    /// Current bounding box in client pixels.
    fn bounding_box(&self) -> BoundingBox;
}
