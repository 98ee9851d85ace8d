use std::time::Duration;

use serde::Deserialize;
use walkers::Position;

/// The map viewport's center and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CameraState {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

impl CameraState {
    pub const fn new(lat: f64, lon: f64, zoom: f64) -> Self {
        Self { lat, lon, zoom }
    }

    /// Linear interpolation between `start` and `end`.
    ///
    /// `progress` is clamped to [0, 1]. The ends are returned verbatim so
    /// that progress 0 and 1 land exactly on the configured cameras.
    pub fn lerp(start: &CameraState, end: &CameraState, progress: f64) -> CameraState {
        if progress.is_nan() || progress <= 0.0 {
            return *start;
        }
        if progress >= 1.0 {
            return *end;
        }

        CameraState {
            lat: start.lat + (end.lat - start.lat) * progress,
            lon: start.lon + (end.lon - start.lon) * progress,
            zoom: start.zoom + (end.zoom - start.zoom) * progress,
        }
    }

    pub fn position(&self) -> Position {
        Position::from_lat_lon(self.lat, self.lon)
    }
}

/// Parameters of an animated camera transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionOptions {
    pub duration: Duration,
    pub ease_linearity: f64,
}

/// Ease-out curve used by camera transitions. A linearity of 1 is a
/// straight line; lower values decelerate harder towards the end.
pub fn ease_out(t: f64, linearity: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let power = 1.0 / linearity.max(0.2);
    1.0 - (1.0 - t).powf(power)
}
