use std::collections::VecDeque;

use crate::{
    scroll::{PageTargets, ScrollEvent, ScrollSource},
    types::ProgressIndicator,
};

/// The scrollable page behind the map.
///
/// There is no document to scroll in a native window, so the page is
/// virtual: its length is a number of viewport heights and its offset
/// moves with wheel and drag input.
#[derive(Debug, Clone)]
pub struct PageScroll {
    offset: f64,
    viewport_height: f64,
    screens: f64,
    pending: VecDeque<ScrollEvent>,
}

impl PageScroll {
    pub fn new(screens: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0.0,
            screens: screens as f64,
            pending: VecDeque::new(),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn scroll_height(&self) -> f64 {
        self.viewport_height * self.screens
    }

    fn max_offset(&self) -> f64 {
        (self.scroll_height() - self.viewport_height).max(0.0)
    }

    /// Applies one frame of input. `delta` is in points, positive scrolls
    /// further down the page. Input is ignored while `locked`. A reading
    /// is queued whenever the offset or the viewport changes.
    pub fn feed(&mut self, delta: f64, viewport_height: f64, locked: bool) {
        let resized = (viewport_height - self.viewport_height).abs() > f64::EPSILON;
        self.viewport_height = viewport_height.max(0.0);

        let previous = self.offset;
        if !locked && delta.is_finite() {
            self.offset += delta;
        }
        self.offset = self.offset.clamp(0.0, self.max_offset());

        if resized || (self.offset - previous).abs() > f64::EPSILON {
            self.pending.push_back(ScrollEvent {
                offset: self.offset,
                scroll_height: self.scroll_height(),
                viewport_height: self.viewport_height,
            });
        }
    }
}

impl ScrollSource for PageScroll {
    fn poll_event(&mut self) -> Option<ScrollEvent> {
        self.pending.pop_front()
    }
}

/// One line of text in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: "Scroll to explore the crawl".to_string(),
            is_error: false,
        }
    }
}

/// The page elements the tour writes to.
#[derive(Debug, Clone)]
pub struct PageState {
    pub progress: ProgressIndicator,
    pub overlay_opacity: f32,
    pub status: StatusLine,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            progress: ProgressIndicator::default(),
            overlay_opacity: 1.0,
            status: StatusLine::default(),
        }
    }
}

impl PageTargets for PageState {
    fn set_progress(&mut self, indicator: ProgressIndicator) {
        self.progress = indicator;
    }

    fn set_overlay_opacity(&mut self, opacity: f32) {
        self.overlay_opacity = opacity.clamp(0.0, 1.0);
    }

    fn show_status_error(&mut self, message: &str) {
        self.status = StatusLine {
            text: message.to_string(),
            is_error: true,
        };
    }
}
