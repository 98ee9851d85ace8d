use std::time::{Duration, Instant};

use logger::{Color, Logger};

use crate::{
    surface::{MapSurface, MarkerIcon, MarkerId},
    timer::Timer,
    types::PointOfInterest,
};

const BASE_SCALE: f32 = 1.0;

struct BakeryMarker {
    bakery: PointOfInterest,
    id: MarkerId,
    scale: f32,
    reset: Timer,
}

/// Numbered bakery pins. Every click grows the pin a step; it shrinks
/// back once it has been left alone for the reset delay.
pub struct MarkerLayer {
    markers: Vec<BakeryMarker>,
    scale_step: f32,
    reset_delay: Duration,
    logger: Logger,
}

impl MarkerLayer {
    /// Creates the marker pane and one pin per bakery.
    pub fn place<S: MapSurface>(
        surface: &mut S,
        bakeries: &[PointOfInterest],
        pane: &str,
        z_index: i32,
        scale_step: f32,
        reset_delay: Duration,
        logger: Logger,
    ) -> Self {
        surface.create_pane(pane, z_index);

        let markers = bakeries
            .iter()
            .map(|bakery| {
                let id = surface.add_marker(
                    pane,
                    bakery.position(),
                    MarkerIcon {
                        label: bakery.number.to_string(),
                    },
                );
                BakeryMarker {
                    bakery: bakery.clone(),
                    id,
                    scale: BASE_SCALE,
                    reset: Timer::new(),
                }
            })
            .collect();

        Self {
            markers,
            scale_step,
            reset_delay,
            logger,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn ids(&self) -> Vec<MarkerId> {
        self.markers.iter().map(|marker| marker.id).collect()
    }

    pub fn scale(&self, id: MarkerId) -> Option<f32> {
        self.markers
            .iter()
            .find(|marker| marker.id == id)
            .map(|marker| marker.scale)
    }

    pub fn has_pending_reset(&self) -> bool {
        self.markers.iter().any(|marker| marker.reset.is_pending())
    }

    /// Handles a click on `id`: grows the pin, pushes its reset back to
    /// a full delay from `now`, and returns the bakery to show.
    pub fn activate<S: MapSurface>(
        &mut self,
        id: MarkerId,
        now: Instant,
        surface: &mut S,
    ) -> Option<PointOfInterest> {
        let marker = self.markers.iter_mut().find(|marker| marker.id == id)?;

        marker.scale += self.scale_step;
        surface.set_marker_scale(marker.id, marker.scale);
        marker.reset.schedule(now, self.reset_delay);

        let _ = self.logger.info(
            &format!(
                "Clicked on {} (#{}), scaled to {:.0}%",
                marker.bakery.name,
                marker.bakery.number,
                marker.scale * 100.0
            ),
            Color::Blue,
            false,
        );

        Some(marker.bakery.clone())
    }

    /// Shrinks every pin whose reset is due. Returns how many were reset.
    pub fn tick<S: MapSurface>(&mut self, now: Instant, surface: &mut S) -> usize {
        let mut resets = 0;
        for marker in &mut self.markers {
            if marker.reset.fire(now) {
                marker.scale = BASE_SCALE;
                surface.set_marker_scale(marker.id, BASE_SCALE);
                let _ = self.logger.info(
                    &format!("{} size reset to normal", marker.bakery.name),
                    Color::White,
                    false,
                );
                resets += 1;
            }
        }
        resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundaryGeometry, BoundaryStyle, CameraState, TransitionOptions, BAKERIES};
    use crate::surface::OverlayId;
    use walkers::Position;

    #[derive(Default)]
    struct PinBoard {
        panes: Vec<(String, i32)>,
        labels: Vec<String>,
        scales: Vec<(MarkerId, f32)>,
    }

    impl MapSurface for PinBoard {
        fn create_pane(&mut self, name: &str, z_index: i32) {
            self.panes.push((name.to_string(), z_index));
        }

        fn fly_to(&mut self, _: CameraState, _: TransitionOptions) {}

        fn add_overlay(&mut self, _: &str, _: BoundaryGeometry, _: BoundaryStyle) -> OverlayId {
            OverlayId(0)
        }

        fn update_overlay_style(&mut self, _: OverlayId, _: BoundaryStyle) {}

        fn add_marker(&mut self, _pane: &str, _position: Position, icon: MarkerIcon) -> MarkerId {
            self.labels.push(icon.label);
            MarkerId(self.labels.len() - 1)
        }

        fn set_marker_scale(&mut self, marker: MarkerId, scale: f32) {
            self.scales.push((marker, scale));
        }
    }

    fn layer(surface: &mut PinBoard) -> MarkerLayer {
        MarkerLayer::place(
            surface,
            &BAKERIES,
            "bakeryPane",
            2000,
            0.1,
            Duration::from_millis(1000),
            Logger::silent(),
        )
    }

    #[test]
    fn places_numbered_pins_on_their_pane() {
        let mut surface = PinBoard::default();
        let markers = layer(&mut surface);

        assert_eq!(markers.len(), 7);
        assert_eq!(surface.panes, vec![("bakeryPane".to_string(), 2000)]);
        assert_eq!(surface.labels[0], "1");
        assert_eq!(surface.labels[6], "7");
    }

    #[test]
    fn reset_fires_after_idle_delay() {
        let mut surface = PinBoard::default();
        let mut markers = layer(&mut surface);
        let id = markers.ids()[2];
        let t0 = Instant::now();

        let bakery = markers.activate(id, t0, &mut surface).unwrap();
        assert_eq!(bakery.name, "Specialty Cafetiere");
        assert!((markers.scale(id).unwrap() - 1.1).abs() < 1e-6);

        assert_eq!(markers.tick(t0 + Duration::from_millis(999), &mut surface), 0);
        assert_eq!(markers.tick(t0 + Duration::from_millis(1000), &mut surface), 1);
        assert_eq!(markers.scale(id), Some(1.0));
        assert_eq!(surface.scales.last(), Some(&(id, 1.0)));
        assert!(!markers.has_pending_reset());
    }

    #[test]
    fn unknown_marker_is_ignored() {
        let mut surface = PinBoard::default();
        let mut markers = layer(&mut surface);
        assert!(markers
            .activate(MarkerId(99), Instant::now(), &mut surface)
            .is_none());
        assert!(surface.scales.is_empty());
    }
}
