use serde_json::Value;

use crate::errors::CoreError;
use crate::models::chart::{Marker, SeriesDatum};
use crate::models::event::{Direction, Event};
use crate::models::point::{Point, RawPoint};
use crate::models::time::{day_start_unix, parse_day};
use crate::providers::traits::DataSource;

/// Turns the raw daily series into the immutable point model.
///
/// Loading is all-or-nothing: a payload that is not an array, a record with
/// an unparseable day or a non-numeric value fails the whole load. There is
/// no partial chart.
///
/// The output is sorted by day with at most one point per day. When a day
/// appears more than once the last record wins, matching how the upstream
/// job rewrites the current day in place.
pub struct SeriesService;

impl SeriesService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the series from `source` and normalize it.
    pub async fn load(&self, source: &dyn DataSource) -> Result<Vec<Point>, CoreError> {
        let payload = source.fetch_series().await?;
        let points = self.parse(payload)?;
        log::info!(
            "Loaded {} daily points from {} ({} with events)",
            points.len(),
            source.name(),
            points.iter().filter(|p| p.has_events()).count()
        );
        Ok(points)
    }

    /// Validate and normalize an already-fetched series payload.
    pub fn parse(&self, payload: Value) -> Result<Vec<Point>, CoreError> {
        if !payload.is_array() {
            return Err(CoreError::InvalidSeries(format!(
                "expected a JSON array, got {}",
                json_kind(&payload)
            )));
        }

        let raw: Vec<RawPoint> = serde_json::from_value(payload)
            .map_err(|e| CoreError::InvalidSeries(e.to_string()))?;

        let mut points = raw
            .into_iter()
            .enumerate()
            .map(|(idx, record)| Self::normalize(idx, record))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps the received order among equal days, so the
        // last-received record ends up last within its run.
        let in_order = points.windows(2).all(|w| w[0].time <= w[1].time);
        if !in_order {
            log::warn!("Series records are out of order; sorting by day");
            points.sort_by_key(|p| p.time);
        }

        Ok(Self::dedup_last_wins(points))
    }

    fn normalize(idx: usize, record: RawPoint) -> Result<Point, CoreError> {
        let date = parse_day(&record.time).ok_or_else(|| {
            CoreError::InvalidSeries(format!(
                "record {idx}: invalid day {:?}, expected YYYY-MM-DD",
                record.time
            ))
        })?;
        let value = record.value.as_f64().ok_or_else(|| {
            CoreError::InvalidSeries(format!(
                "record {idx} ({}): value {:?} is not a number",
                record.time, record.value
            ))
        })?;

        Ok(Point::with_events(
            day_start_unix(date),
            value,
            record
                .events
                .unwrap_or_default()
                .into_iter()
                .map(Event::from_raw)
                .collect(),
        ))
    }

    fn dedup_last_wins(points: Vec<Point>) -> Vec<Point> {
        let mut out: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            match out.last_mut() {
                Some(last) if last.time == point.time => {
                    log::warn!("Duplicate series day {}; keeping the later record", point.time);
                    *last = point;
                }
                _ => out.push(point),
            }
        }
        out
    }

    /// `{time, value}` pairs for the rendering surface.
    pub fn series_data(&self, points: &[Point]) -> Vec<SeriesDatum> {
        points
            .iter()
            .map(|p| SeriesDatum {
                time: p.time,
                value: p.value,
            })
            .collect()
    }

    /// One marker per event-bearing day, pointing the way of its largest move.
    pub fn markers(&self, points: &[Point]) -> Vec<Marker> {
        points
            .iter()
            .filter_map(|p| {
                let largest = p
                    .events()?
                    .iter()
                    .max_by(|a, b| a.value.abs().total_cmp(&b.value.abs()))?;
                Some(Marker {
                    time: p.time,
                    direction: Direction::of(largest.value),
                })
            })
            .collect()
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
