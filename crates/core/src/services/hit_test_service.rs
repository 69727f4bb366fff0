use crate::models::chart::{BoundingBox, MarkerHitbox};
use crate::models::point::Point;
use crate::providers::surface::RenderingSurface;

/// Resolves touch taps to event-bearing days.
///
/// Touch has no hover, so the projected x of every event-bearing day is
/// cached whenever the visible range moves, and a tap is matched against
/// that cache instead of the surface's crosshair.
pub struct HitTestService {
    threshold: f64,
    hitboxes: Vec<MarkerHitbox>,
}

impl HitTestService {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            hitboxes: Vec::new(),
        }
    }

    /// Re-project every event-bearing day. Replaces the whole cache, so
    /// calling it again with an unchanged range reproduces the same entries.
    pub fn rebuild(&mut self, points: &[Point], surface: &dyn RenderingSurface) {
        self.hitboxes = points
            .iter()
            .filter(|p| p.has_events())
            .map(|p| MarkerHitbox {
                time: p.time,
                x: surface.time_to_coordinate(p.time).filter(|x| x.is_finite()),
            })
            .collect();
    }

    pub fn hitboxes(&self) -> &[MarkerHitbox] {
        &self.hitboxes
    }

    /// Nearest projected day to `offset_x` (pixels from the surface's left
    /// edge), if it is strictly closer than the threshold.
    pub fn resolve(&self, offset_x: f64) -> Option<i64> {
        let mut best: Option<(i64, f64)> = None;
        for hitbox in &self.hitboxes {
            let Some(x) = hitbox.x else { continue };
            let distance = (x - offset_x).abs();
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((hitbox.time, distance)),
            }
        }
        best.filter(|&(_, d)| d < self.threshold).map(|(time, _)| time)
    }

    /// Resolve a tap given in client pixels against the surface's bounds.
    pub fn resolve_tap(&self, client_x: f64, bounds: &BoundingBox) -> Option<i64> {
        self.resolve(client_x - bounds.left)
    }
}
