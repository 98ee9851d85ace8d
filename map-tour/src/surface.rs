use std::{cell::RefCell, rc::Rc, time::Instant};

use walkers::{Map, Position, TileId, Tiles};

use crate::{
    plugins,
    preload::TileWarmer,
    types::{ease_out, BoundaryGeometry, BoundaryStyle, CameraState, TransitionOptions},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub usize);

/// What a marker looks like: a numbered pin.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub label: String,
}

/// The capabilities the tour needs from a map renderer.
///
/// Scroll handling and marker state only talk to the map through this
/// trait, so both run against a fake in tests.
pub trait MapSurface {
    /// Registers a named rendering layer. Higher `z_index` draws on top.
    fn create_pane(&mut self, name: &str, z_index: i32);

    /// Starts an animated move of the camera to `camera`.
    fn fly_to(&mut self, camera: CameraState, options: TransitionOptions);

    fn add_overlay(
        &mut self,
        pane: &str,
        geometry: BoundaryGeometry,
        style: BoundaryStyle,
    ) -> OverlayId;

    fn update_overlay_style(&mut self, overlay: OverlayId, style: BoundaryStyle);

    fn add_marker(&mut self, pane: &str, position: Position, icon: MarkerIcon) -> MarkerId;

    fn set_marker_scale(&mut self, marker: MarkerId, scale: f32);
}

/// Camera motion between two states, sampled per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    from: CameraState,
    to: CameraState,
    started: Instant,
    options: TransitionOptions,
}

impl CameraAnimation {
    /// A finished animation resting at `camera`.
    pub fn at_rest(camera: CameraState, now: Instant) -> Self {
        Self {
            from: camera,
            to: camera,
            started: now,
            options: TransitionOptions {
                duration: Default::default(),
                ease_linearity: 1.0,
            },
        }
    }

    /// Starts a new leg from wherever the camera is right now.
    pub fn retarget(&mut self, now: Instant, to: CameraState, options: TransitionOptions) {
        self.from = self.sample(now);
        self.to = to;
        self.started = now;
        self.options = options;
    }

    pub fn sample(&self, now: Instant) -> CameraState {
        let duration = self.options.duration.as_secs_f64();
        if duration <= 0.0 {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64() / duration;
        CameraState::lerp(&self.from, &self.to, ease_out(t, self.options.ease_linearity))
    }

    pub fn is_running(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < self.options.duration
    }
}

pub(crate) struct Pane {
    pub name: String,
    pub z_index: i32,
}

pub(crate) struct Overlay {
    pub pane: String,
    pub geometry: BoundaryGeometry,
    pub style: BoundaryStyle,
}

pub(crate) struct Marker {
    pub id: MarkerId,
    pub pane: String,
    pub position: Position,
    pub icon: MarkerIcon,
    pub scale: f32,
}

/// `MapSurface` backed by a walkers slippy map.
pub struct WalkersSurface {
    tiles: Box<dyn Tiles>,
    map_memory: walkers::MapMemory,
    camera: CameraAnimation,
    panes: Vec<Pane>,
    overlays: Vec<Overlay>,
    markers: Vec<Marker>,
    clicked: Rc<RefCell<Vec<MarkerId>>>,
    now: Instant,
}

impl WalkersSurface {
    pub fn new(tiles: Box<dyn Tiles>, start: CameraState, now: Instant) -> Self {
        let mut map_memory = walkers::MapMemory::default();
        map_memory.set_zoom(start.zoom).ok();

        Self {
            tiles,
            map_memory,
            camera: CameraAnimation::at_rest(start, now),
            panes: Vec::new(),
            overlays: Vec::new(),
            markers: Vec::new(),
            clicked: Rc::new(RefCell::new(Vec::new())),
            now,
        }
    }

    /// Sets the clock used by camera requests made during this frame.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.camera.is_running(now)
    }

    /// Markers clicked since the last call.
    pub fn take_clicked_markers(&mut self) -> Vec<MarkerId> {
        std::mem::take(&mut *self.clicked.borrow_mut())
    }

    /// Draws the map at `now` and returns the widget response. Gestures
    /// are disabled: the camera only moves through `fly_to`.
    pub fn show(&mut self, ui: &mut egui::Ui, now: Instant) -> egui::Response {
        self.now = now;
        let camera = self.camera.sample(now);
        self.map_memory.set_zoom(camera.zoom).ok();

        let mut panes: Vec<&Pane> = self.panes.iter().collect();
        panes.sort_by_key(|pane| pane.z_index);

        let mut map = Map::new(
            Some(self.tiles.as_mut()),
            &mut self.map_memory,
            camera.position(),
        )
        .zoom_gesture(false)
        .drag_gesture(false);

        for pane in panes {
            map = map.with_plugin(plugins::PaneLayer::new(
                &pane.name,
                &self.overlays,
                &self.markers,
                self.clicked.clone(),
            ));
        }

        ui.add(map)
    }
}

impl MapSurface for WalkersSurface {
    fn create_pane(&mut self, name: &str, z_index: i32) {
        if let Some(pane) = self.panes.iter_mut().find(|pane| pane.name == name) {
            pane.z_index = z_index;
        } else {
            self.panes.push(Pane {
                name: name.to_string(),
                z_index,
            });
        }
    }

    fn fly_to(&mut self, camera: CameraState, options: TransitionOptions) {
        self.camera.retarget(self.now, camera, options);
    }

    fn add_overlay(
        &mut self,
        pane: &str,
        geometry: BoundaryGeometry,
        style: BoundaryStyle,
    ) -> OverlayId {
        self.overlays.push(Overlay {
            pane: pane.to_string(),
            geometry,
            style,
        });
        OverlayId(self.overlays.len() - 1)
    }

    fn update_overlay_style(&mut self, overlay: OverlayId, style: BoundaryStyle) {
        if let Some(overlay) = self.overlays.get_mut(overlay.0) {
            overlay.style = style;
        }
    }

    fn add_marker(&mut self, pane: &str, position: Position, icon: MarkerIcon) -> MarkerId {
        let id = MarkerId(self.markers.len());
        self.markers.push(Marker {
            id,
            pane: pane.to_string(),
            position,
            icon,
            scale: 1.0,
        });
        id
    }

    fn set_marker_scale(&mut self, marker: MarkerId, scale: f32) {
        if let Some(marker) = self.markers.get_mut(marker.0) {
            marker.scale = scale;
        }
    }
}

/// Preloading goes through the map's own tile source, so warmed tiles
/// land in the cache the map draws from.
impl TileWarmer for WalkersSurface {
    fn warm(&mut self, tile: TileId) {
        // Only the request side effect matters here.
        let _ = self.tiles.at(tile);
    }
}
