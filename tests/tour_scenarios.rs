use std::{
    collections::VecDeque,
    fs,
    sync::Arc,
    time::{Duration, Instant},
};

use logger::Logger;
use map_tour::{
    boundary::{AssetBase, AssetClient, AssetSource, BoundaryError, BoundaryLoader},
    markers::MarkerLayer,
    page::PageState,
    scroll::{ScrollController, ScrollEvent, ScrollSource},
    surface::{MapSurface, MarkerIcon, MarkerId, OverlayId},
    types::{BoundaryGeometry, BoundaryStyle, CameraState, TransitionOptions, BAKERIES},
    TourConfig,
};
use walkers::Position;

const VIEWPORT: f64 = 800.0;
const PAGE: f64 = 3200.0;

/// Records everything the tour asks of the map.
#[derive(Default)]
struct FakeMap {
    panes: Vec<(String, i32)>,
    flights: Vec<CameraState>,
    overlays: Vec<(String, usize)>,
    styles: Vec<(OverlayId, BoundaryStyle)>,
    markers: usize,
    scales: Vec<(MarkerId, f32)>,
}

impl MapSurface for FakeMap {
    fn create_pane(&mut self, name: &str, z_index: i32) {
        self.panes.push((name.to_string(), z_index));
    }

    fn fly_to(&mut self, camera: CameraState, _options: TransitionOptions) {
        self.flights.push(camera);
    }

    fn add_overlay(
        &mut self,
        pane: &str,
        geometry: BoundaryGeometry,
        _style: BoundaryStyle,
    ) -> OverlayId {
        self.overlays.push((pane.to_string(), geometry.point_count()));
        OverlayId(self.overlays.len() - 1)
    }

    fn update_overlay_style(&mut self, overlay: OverlayId, style: BoundaryStyle) {
        self.styles.push((overlay, style));
    }

    fn add_marker(&mut self, _pane: &str, _position: Position, _icon: MarkerIcon) -> MarkerId {
        self.markers += 1;
        MarkerId(self.markers - 1)
    }

    fn set_marker_scale(&mut self, marker: MarkerId, scale: f32) {
        self.scales.push((marker, scale));
    }
}

/// Replays fixed scroll offsets.
struct ScriptedScroll(VecDeque<ScrollEvent>);

impl ScriptedScroll {
    fn new(offsets: &[f64]) -> Self {
        Self(
            offsets
                .iter()
                .map(|&offset| reading(offset))
                .collect(),
        )
    }
}

impl ScrollSource for ScriptedScroll {
    fn poll_event(&mut self) -> Option<ScrollEvent> {
        self.0.pop_front()
    }
}

struct Offline;

impl AssetSource for Offline {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, BoundaryError> {
        Err(BoundaryError::Network(format!("{} unreachable", url)))
    }
}

fn reading(offset: f64) -> ScrollEvent {
    ScrollEvent {
        offset,
        scroll_height: PAGE,
        viewport_height: VIEWPORT,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn tour_survives_both_boundaries_failing() {
    let config = TourConfig::default();
    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());

    let mut loader = BoundaryLoader::spawn(&config.boundaries, Arc::new(Offline), Logger::silent());
    loader.finish(&mut map, &mut controller, &mut page);

    assert_eq!(loader.failures(), 2);
    assert!(!loader.is_pending());
    assert!(map.overlays.is_empty());
    assert!(page.status.is_error);
    assert_eq!(page.status.text, "Warning: Both boundaries failed to load");

    let frame = controller
        .handle(&reading(1200.0), Instant::now(), &mut map, &mut page)
        .unwrap();
    assert!(close(frame.progress, 0.5));
    assert_eq!(map.flights.len(), 1);
    assert!(map.styles.is_empty());
    assert_eq!(page.progress.label(), "50%");
}

#[test]
fn boundaries_load_from_asset_directory() {
    let mut config = TourConfig::default();
    config.asset_base = concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string();

    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());
    let source = Arc::new(AssetClient::new(AssetBase::parse(&config.asset_base)));

    let mut loader = BoundaryLoader::spawn(&config.boundaries, source, Logger::silent());
    loader.finish(&mut map, &mut controller, &mut page);

    assert_eq!(loader.failures(), 0);
    assert!(!page.status.is_error);
    assert_eq!(map.overlays.len(), 2);
    assert!(map.overlays.iter().all(|(_, points)| *points >= 4));
    assert!(controller.is_attached("Hackney"));
    assert!(controller.is_attached("Westminster"));

    // Fully scrolled: both strokes sit at the fade floor.
    controller.handle(&reading(2400.0), Instant::now(), &mut map, &mut page);
    assert_eq!(map.styles.len(), 2);
    for (_, style) in &map.styles {
        assert!((style.opacity - 0.6).abs() < 1e-5);
    }
    let hackney = map
        .styles
        .iter()
        .find(|(id, _)| map.overlays[id.0].0 == "hackneyPane");
    assert!((hackney.unwrap().1.fill_opacity - 0.4).abs() < 1e-5);
}

#[test]
fn late_boundary_catches_up_with_scroll() {
    let mut config = TourConfig::default();
    config.asset_base = concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string();

    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());

    controller.handle(&reading(2400.0), Instant::now(), &mut map, &mut page);
    assert!(map.styles.is_empty());

    let source = Arc::new(AssetClient::new(AssetBase::parse(&config.asset_base)));
    let mut loader = BoundaryLoader::spawn(&config.boundaries, source, Logger::silent());
    loader.finish(&mut map, &mut controller, &mut page);

    assert_eq!(map.styles.len(), 2);
    assert!(map.styles.iter().all(|(_, s)| (s.opacity - 0.6).abs() < 1e-5));
}

#[test]
fn guard_drops_events_inside_window() {
    let config = TourConfig::default();
    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());
    let t0 = Instant::now();

    let mut burst = ScriptedScroll::new(&[600.0, 900.0, 1200.0]);
    assert_eq!(controller.drain(&mut burst, t0, &mut map, &mut page), 1);
    assert_eq!(map.flights.len(), 1);
    assert!(close(controller.last_frame().unwrap().raw_progress, 0.25));

    let mut late = ScriptedScroll::new(&[1200.0]);
    let t1 = t0 + config.animation.transition_guard();
    assert_eq!(controller.drain(&mut late, t1, &mut map, &mut page), 1);
    assert!(close(controller.last_frame().unwrap().progress, 0.5));
}

#[test]
fn page_without_scroll_room_stays_at_start() {
    let config = TourConfig::default();
    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());

    let event = ScrollEvent {
        offset: 0.0,
        scroll_height: VIEWPORT,
        viewport_height: VIEWPORT,
    };
    let frame = controller
        .handle(&event, Instant::now(), &mut map, &mut page)
        .unwrap();

    assert_eq!(frame.progress, 0.0);
    assert_eq!(map.flights[0], config.map.start);
    assert_eq!(page.overlay_opacity, 1.0);
    assert_eq!(page.progress.filled_blocks, 0);
}

#[test]
fn scrolling_to_the_end_lands_on_the_final_view() {
    let config = TourConfig::default();
    let mut map = FakeMap::default();
    let mut page = PageState::default();
    let mut controller = ScrollController::new(&config, Logger::silent());

    // 93% of the way down snaps to the end.
    let frame = controller
        .handle(&reading(2232.0), Instant::now(), &mut map, &mut page)
        .unwrap();

    assert_eq!(frame.progress, 1.0);
    assert_eq!(map.flights[0], config.map.end);
    assert_eq!(page.overlay_opacity, 0.0);
    assert_eq!(page.progress.label(), "100%");
    assert_eq!(page.progress.filled_blocks, 20);
}

#[test]
fn repeated_marker_clicks_compound_and_reset_once() {
    let config = TourConfig::default();
    let mut map = FakeMap::default();
    let mut markers = MarkerLayer::place(
        &mut map,
        &BAKERIES,
        &config.markers.pane,
        config.markers.z_index,
        config.markers.scale_step,
        config.animation.reset_timeout(),
        Logger::silent(),
    );
    assert_eq!(map.panes, vec![("bakeryPane".to_string(), 2000)]);
    let id = markers.ids()[0];
    let t0 = Instant::now();

    markers.activate(id, t0, &mut map);
    let t1 = t0 + Duration::from_millis(400);
    let bakery = markers.activate(id, t1, &mut map).unwrap();
    assert_eq!(bakery.name, "FORNO");
    assert!((markers.scale(id).unwrap() - 1.2).abs() < 1e-5);

    // The first click's reset was superseded by the second.
    assert_eq!(markers.tick(t0 + Duration::from_millis(1000), &mut map), 0);
    assert_eq!(markers.tick(t1 + Duration::from_millis(1000), &mut map), 1);
    assert_eq!(markers.tick(t1 + Duration::from_millis(5000), &mut map), 0);
    assert_eq!(markers.scale(id), Some(1.0));
    assert_eq!(
        map.scales
            .iter()
            .filter(|(marker, scale)| *marker == id && *scale == 1.0)
            .count(),
        1
    );
}

#[test]
fn debug_log_level_records_scroll_readings() {
    let log_dir = std::env::temp_dir().join("bakery_crawl_scroll_log");
    fs::create_dir_all(&log_dir).unwrap();

    let verbose = TourConfig::from_json(r#"{ "log_level": "debug" }"#).unwrap();
    let quiet = TourConfig::default();

    for (session, config) in [("verbose", &verbose), ("quiet", &quiet)] {
        let logger = Logger::new(&log_dir, session)
            .unwrap()
            .with_min_level(config.log_level.into());
        let mut map = FakeMap::default();
        let mut page = PageState::default();
        let mut controller = ScrollController::new(config, logger);
        controller.handle(&reading(1200.0), Instant::now(), &mut map, &mut page);
    }

    let verbose_log = fs::read_to_string(log_dir.join("verbose.log")).unwrap();
    assert!(verbose_log.contains("[DEBUG]"));
    assert!(verbose_log.contains("Scroll: offset 1200, max 2400"));
    assert!(verbose_log.contains("adjusted 50.0%"));

    let quiet_log = fs::read_to_string(log_dir.join("quiet.log")).unwrap();
    assert!(!quiet_log.contains("Scroll:"));

    fs::remove_dir_all(&log_dir).unwrap();
}
