use std::time::{Duration, Instant};

use logger::{Level, Logger};

use crate::{
    config::TourConfig,
    surface::{MapSurface, OverlayId},
    timer::Timer,
    types::{BoundaryFade, BoundaryStyle, CameraState, ProgressIndicator, TransitionOptions},
};

/// One reading of the page scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub offset: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollEvent {
    /// Scrollable distance, never below 1 so short pages don't divide by zero.
    pub fn max_extent(&self) -> f64 {
        (self.scroll_height - self.viewport_height).max(1.0)
    }
}

/// Anything that produces scroll readings: the real page, or a script in tests.
pub trait ScrollSource {
    fn poll_event(&mut self) -> Option<ScrollEvent>;
}

/// Write-only page elements driven by the scroll position.
pub trait PageTargets {
    fn set_progress(&mut self, indicator: ProgressIndicator);

    fn set_overlay_opacity(&mut self, opacity: f32);

    fn show_status_error(&mut self, message: &str);
}

/// `offset / max(1, max_extent)` clamped to [0, 1].
pub fn raw_progress(offset: f64, max_extent: f64) -> f64 {
    let progress = offset / max_extent.max(1.0);
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

/// Collapses progress near the ends to exactly 0 or 1. Stateless: the
/// result only depends on the current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPolicy {
    pub low: f64,
    pub high: f64,
}

impl SnapPolicy {
    pub fn apply(&self, progress: f64) -> f64 {
        if progress < self.low {
            0.0
        } else if progress > self.high {
            1.0
        } else {
            progress
        }
    }
}

/// Title overlay opacity: opaque at the top, gone by the middle of the page.
pub fn overlay_opacity(progress: f64) -> f32 {
    (1.0 - 2.0 * progress).max(0.0) as f32
}

/// A boundary the controller fades. `overlay` stays `None` when the
/// boundary failed to load.
#[derive(Debug, Clone)]
struct BoundaryBinding {
    name: String,
    overlay: Option<OverlayId>,
    style: BoundaryStyle,
    fade: BoundaryFade,
}

/// Everything one admitted scroll event produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    pub raw_progress: f64,
    pub progress: f64,
    pub camera: CameraState,
    pub indicator: ProgressIndicator,
    pub overlay_opacity: f32,
}

/// Turns scroll readings into camera moves, boundary fades, the progress
/// bar and the title fade.
///
/// After a camera request, further events are dropped until the guard
/// delay elapses. The guard is a rate limiter: it does not wait for the
/// camera animation to finish.
pub struct ScrollController {
    start: CameraState,
    end: CameraState,
    snap: SnapPolicy,
    transition: TransitionOptions,
    block_increment: u32,
    block_count: usize,
    guard: Timer,
    guard_delay: Duration,
    boundaries: Vec<BoundaryBinding>,
    last_frame: Option<ScrollFrame>,
    logger: Logger,
}

impl ScrollController {
    pub fn new(config: &TourConfig, logger: Logger) -> Self {
        Self {
            start: config.map.start,
            end: config.map.end,
            snap: SnapPolicy {
                low: config.scroll.snap_threshold_start,
                high: config.scroll.snap_threshold_end,
            },
            transition: config.animation.transition(),
            block_increment: config.scroll.progress_block_increment,
            block_count: config.scroll.progress_block_count,
            guard: Timer::new(),
            guard_delay: config.animation.transition_guard(),
            boundaries: config
                .boundaries
                .iter()
                .map(|boundary| BoundaryBinding {
                    name: boundary.name.clone(),
                    overlay: None,
                    style: boundary.style,
                    fade: boundary.fade,
                })
                .collect(),
            last_frame: None,
            logger,
        }
    }

    /// Hooks a loaded overlay to the boundary called `name`, bringing its
    /// style in line with the current progress. Returns `false` for an
    /// unknown boundary.
    pub fn attach_boundary<S: MapSurface>(
        &mut self,
        name: &str,
        overlay: OverlayId,
        surface: &mut S,
    ) -> bool {
        let progress = self.last_frame.map(|frame| frame.progress);
        match self.boundaries.iter_mut().find(|b| b.name == name) {
            Some(binding) => {
                binding.overlay = Some(overlay);
                if let Some(progress) = progress {
                    let style = binding.style.faded(&binding.fade, progress);
                    surface.update_overlay_style(overlay, style);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self, name: &str) -> bool {
        self.boundaries
            .iter()
            .any(|b| b.name == name && b.overlay.is_some())
    }

    /// Clears the transition guard once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        self.guard.fire(now);
    }

    pub fn is_transitioning(&self) -> bool {
        self.guard.is_pending()
    }

    pub fn guard_remaining(&self, now: Instant) -> Option<Duration> {
        self.guard.remaining(now)
    }

    pub fn last_frame(&self) -> Option<&ScrollFrame> {
        self.last_frame.as_ref()
    }

    /// The pure part of event handling: where this reading puts the tour.
    pub fn frame_for(&self, event: &ScrollEvent) -> ScrollFrame {
        let raw = raw_progress(event.offset, event.max_extent());
        let progress = self.snap.apply(raw);

        ScrollFrame {
            raw_progress: raw,
            progress,
            camera: CameraState::lerp(&self.start, &self.end, progress),
            indicator: ProgressIndicator::from_progress(
                progress,
                self.block_increment,
                self.block_count,
            ),
            overlay_opacity: overlay_opacity(progress),
        }
    }

    /// Handles one scroll reading. Returns `None` when the event was
    /// dropped because a transition was still guarded.
    pub fn handle<S: MapSurface, P: PageTargets>(
        &mut self,
        event: &ScrollEvent,
        now: Instant,
        surface: &mut S,
        page: &mut P,
    ) -> Option<ScrollFrame> {
        self.tick(now);
        if self.is_transitioning() {
            return None;
        }

        let frame = self.frame_for(event);

        if self.logger.enabled(Level::Debug) {
            let _ = self.logger.debug(
                &format!(
                    "Scroll: offset {:.0}, max {:.0}, raw {:.1}%, adjusted {:.1}%, block {}",
                    event.offset,
                    event.max_extent(),
                    frame.raw_progress * 100.0,
                    frame.progress * 100.0,
                    frame.indicator.label()
                ),
                true,
            );
        }

        self.guard.schedule(now, self.guard_delay);
        surface.fly_to(frame.camera, self.transition);

        for binding in &self.boundaries {
            if let Some(overlay) = binding.overlay {
                let style = binding.style.faded(&binding.fade, frame.progress);
                surface.update_overlay_style(overlay, style);
            }
        }

        page.set_progress(frame.indicator);
        page.set_overlay_opacity(frame.overlay_opacity);

        self.last_frame = Some(frame);
        Some(frame)
    }

    /// Drains every pending reading from `source`; returns how many were admitted.
    pub fn drain<Src: ScrollSource, S: MapSurface, P: PageTargets>(
        &mut self,
        source: &mut Src,
        now: Instant,
        surface: &mut S,
        page: &mut P,
    ) -> usize {
        let mut admitted = 0;
        while let Some(event) = source.poll_event() {
            if self.handle(&event, now, surface, page).is_some() {
                admitted += 1;
            }
        }
        admitted
    }
}
