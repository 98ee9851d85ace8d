use std::{
    collections::{HashSet, VecDeque},
    f64::consts::PI,
    time::{Duration, Instant},
};

use logger::{Color, Level, Logger};
use walkers::TileId;

use crate::{config::PreloadConfig, types::CameraState};

const TILE_SIZE: f64 = 256.0;
const MAX_ZOOM: u8 = 19;

/// Something that can pull a tile into the cache the visible map reads.
pub trait TileWarmer {
    fn warm(&mut self, tile: TileId);
}

/// Tiles (at the rounded zoom) that cover a `viewport` sized window
/// centred on `camera`.
pub fn tiles_covering(camera: &CameraState, viewport: [f32; 2]) -> Vec<TileId> {
    let zoom = camera.zoom.round().clamp(0.0, MAX_ZOOM as f64) as u8;
    let n = 2f64.powi(zoom as i32);
    let last = (n as u32).saturating_sub(1);

    let lat = camera.lat.clamp(-85.0511, 85.0511).to_radians();
    let x = (camera.lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;

    let half_w = viewport[0].max(0.0) as f64 / 2.0 / TILE_SIZE;
    let half_h = viewport[1].max(0.0) as f64 / 2.0 / TILE_SIZE;

    let to_index = |v: f64| (v.floor().max(0.0) as u32).min(last);
    let (x0, x1) = (to_index(x - half_w), to_index(x + half_w));
    let (y0, y1) = (to_index(y - half_h), to_index(y + half_h));

    let mut tiles = Vec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            tiles.push(TileId { x, y, zoom });
        }
    }
    tiles
}

/// Visits the preload viewpoints one step apart and hands their tiles to
/// a warmer a few per frame, so the tile request queue never overflows.
/// The walk ends a fixed linger after the last step, by elapsed time only.
pub struct Preloader {
    points: Vec<CameraState>,
    viewport: [f32; 2],
    step: Duration,
    linger: Duration,
    tiles_per_tick: usize,
    start: Option<Instant>,
    next: usize,
    queue: VecDeque<TileId>,
    seen: HashSet<TileId>,
    requested: usize,
    done: bool,
    logger: Logger,
}

impl Preloader {
    pub fn new(config: &PreloadConfig, viewport: [f32; 2], logger: Logger) -> Self {
        Self {
            points: config.points.clone(),
            viewport,
            step: config.step(),
            linger: config.linger(),
            tiles_per_tick: config.tiles_per_tick.max(1),
            start: None,
            next: 0,
            queue: VecDeque::new(),
            seen: HashSet::new(),
            requested: 0,
            done: false,
            logger,
        }
    }

    /// Starts the walk `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.start = now.checked_add(delay);
        self.next = 0;
        self.queue.clear();
        self.seen.clear();
        self.requested = 0;
        self.done = false;

        if self.start.is_none() {
            let _ = self
                .logger
                .warn("Preload delay out of range, skipping tile preload", true);
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() && !self.done
    }

    /// Viewpoints visited so far.
    pub fn warmed(&self) -> usize {
        self.next
    }

    /// Tile requests handed to the warmer so far.
    pub fn requested(&self) -> usize {
        self.requested
    }

    // Instant `steps` steps after the start, if it is representable.
    fn step_at(&self, start: Instant, steps: usize) -> Option<Instant> {
        let steps = u32::try_from(steps).ok()?;
        start.checked_add(self.step.checked_mul(steps)?)
    }

    pub fn tick<W: TileWarmer + ?Sized>(&mut self, now: Instant, warmer: &mut W) {
        let Some(start) = self.start else {
            return;
        };
        if self.done {
            return;
        }

        let total = self.points.len();
        if self.next == 0 && now >= start {
            let _ = self
                .logger
                .info("Preloading map tiles for scroll path", Color::Cyan, false);
        }
        while self.next < total && self.step_at(start, self.next).is_some_and(|at| now >= at) {
            for tile in tiles_covering(&self.points[self.next], self.viewport) {
                if self.seen.insert(tile) {
                    self.queue.push_back(tile);
                }
            }
            self.next += 1;
            if self.logger.enabled(Level::Debug) {
                let _ = self.logger.debug(
                    &format!("Preloaded tiles for point {}/{}", self.next, total),
                    false,
                );
            }
        }

        let batch = self.tiles_per_tick.min(self.queue.len());
        for tile in self.queue.drain(..batch) {
            warmer.warm(tile);
            self.requested += 1;
        }

        let finished = self
            .step_at(start, total)
            .and_then(|at| at.checked_add(self.linger))
            .is_some_and(|at| now >= at);
        if self.next == total && self.queue.is_empty() && finished {
            self.done = true;
            self.seen.clear();
            let _ = self.logger.info("Preloading complete", Color::Green, false);
        }
    }
}
