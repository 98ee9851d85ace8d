use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use logger::{Color, Logger};

use crate::{timer::Timer, types::PointOfInterest};

pub const FULLSCREEN_DIALOG: &str = "fullscreen-dialog";
pub const WELCOME_DIALOG: &str = "welcome-dialog";
pub const BAKERY_POPUP: &str = "bakery-popup";
pub const RECOMMENDATIONS_POPUP: &str = "recommendations-popup";
pub const STARTING_BAKERY_POPUP: &str = "starting-bakery-popup";

/// Whether page scrolling is currently allowed. Owned by the dialog
/// manager, read by the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollLock {
    disabled: bool,
}

impl ScrollLock {
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Buttons the dialog windows can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    EnterFullscreen,
    SkipFullscreen,
    CloseFullscreen,
    StartJourney,
    MoveToRecommendations,
    CloseWelcome,
    CloseBakeryPopup,
    ShowRecommendations,
    CloseRecommendations,
    ShowStartingBakery,
    CloseStartingBakery,
}

/// Named overlays with two states, visible or hidden, and the delayed
/// steps of the opening sequence.
pub struct DialogManager {
    visible: HashSet<String>,
    scroll_lock: ScrollLock,
    bakery: Option<PointOfInterest>,
    fullscreen_timer: Timer,
    welcome_timer: Timer,
    dialog_delay: Duration,
    fullscreen_requested: bool,
    logger: Logger,
}

impl DialogManager {
    pub fn new(dialog_delay: Duration, logger: Logger) -> Self {
        Self {
            visible: HashSet::new(),
            scroll_lock: ScrollLock::default(),
            bakery: None,
            fullscreen_timer: Timer::new(),
            welcome_timer: Timer::new(),
            dialog_delay,
            fullscreen_requested: false,
            logger,
        }
    }

    /// Schedules the fullscreen prompt `delay` after `now`.
    pub fn init(&mut self, now: Instant, delay: Duration) {
        self.fullscreen_timer.schedule(now, delay);
    }

    pub fn show(&mut self, id: &str) {
        self.visible.insert(id.to_string());
    }

    pub fn hide(&mut self, id: &str) {
        self.visible.remove(id);
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock
    }

    pub fn has_pending(&self) -> bool {
        self.fullscreen_timer.is_pending() || self.welcome_timer.is_pending()
    }

    /// The bakery shown by the bakery popup.
    pub fn bakery(&self) -> Option<&PointOfInterest> {
        self.bakery.as_ref()
    }

    /// Fills the bakery popup and opens it.
    pub fn show_bakery(&mut self, bakery: PointOfInterest) {
        self.bakery = Some(bakery);
        self.show(BAKERY_POPUP);
    }

    /// Whether a fullscreen request is waiting; clears it.
    pub fn take_fullscreen_request(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    /// Runs the delayed steps that are due.
    pub fn tick(&mut self, now: Instant) {
        if self.fullscreen_timer.fire(now) {
            self.scroll_lock.set_disabled(true);
            self.show(FULLSCREEN_DIALOG);
        }
        if self.welcome_timer.fire(now) {
            self.show(WELCOME_DIALOG);
        }
    }

    pub fn apply(&mut self, action: DialogAction, now: Instant) {
        match action {
            DialogAction::EnterFullscreen => {
                self.fullscreen_requested = true;
                self.hide(FULLSCREEN_DIALOG);
                self.welcome_timer.schedule(now, self.dialog_delay);
            }
            DialogAction::SkipFullscreen | DialogAction::CloseFullscreen => {
                self.hide(FULLSCREEN_DIALOG);
                self.welcome_timer.schedule(now, self.dialog_delay);
            }
            DialogAction::StartJourney | DialogAction::CloseWelcome => {
                self.hide(WELCOME_DIALOG);
                self.scroll_lock.set_disabled(false);
            }
            DialogAction::MoveToRecommendations => {
                self.hide(WELCOME_DIALOG);
                self.scroll_lock.set_disabled(false);
                let _ = self.logger.info(
                    "Move to Recommendations clicked - there is no recommendations site yet",
                    Color::Magenta,
                    false,
                );
            }
            DialogAction::CloseBakeryPopup => self.hide(BAKERY_POPUP),
            DialogAction::ShowRecommendations => {
                self.scroll_lock.set_disabled(true);
                self.show(RECOMMENDATIONS_POPUP);
            }
            DialogAction::CloseRecommendations => {
                self.hide(RECOMMENDATIONS_POPUP);
                self.scroll_lock.set_disabled(false);
            }
            DialogAction::ShowStartingBakery => self.show(STARTING_BAKERY_POPUP),
            DialogAction::CloseStartingBakery => {
                self.hide(STARTING_BAKERY_POPUP);
                self.scroll_lock.set_disabled(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BAKERIES;

    fn manager() -> DialogManager {
        DialogManager::new(Duration::from_millis(300), Logger::silent())
    }

    #[test]
    fn show_and_hide_are_idempotent() {
        let mut dialogs = manager();
        dialogs.show(RECOMMENDATIONS_POPUP);
        dialogs.show(RECOMMENDATIONS_POPUP);
        assert!(dialogs.is_visible(RECOMMENDATIONS_POPUP));
        dialogs.hide(RECOMMENDATIONS_POPUP);
        assert!(!dialogs.is_visible(RECOMMENDATIONS_POPUP));
        dialogs.hide(RECOMMENDATIONS_POPUP);
        dialogs.hide("no-such-dialog");
        assert!(!dialogs.is_visible(RECOMMENDATIONS_POPUP));
    }

    #[test]
    fn opening_sequence() {
        let mut dialogs = manager();
        let t0 = Instant::now();
        dialogs.init(t0, Duration::from_millis(500));

        dialogs.tick(t0 + Duration::from_millis(499));
        assert!(!dialogs.is_visible(FULLSCREEN_DIALOG));
        assert!(!dialogs.scroll_lock().is_disabled());

        let t1 = t0 + Duration::from_millis(500);
        dialogs.tick(t1);
        assert!(dialogs.is_visible(FULLSCREEN_DIALOG));
        assert!(dialogs.scroll_lock().is_disabled());

        dialogs.apply(DialogAction::EnterFullscreen, t1);
        assert!(dialogs.take_fullscreen_request());
        assert!(!dialogs.take_fullscreen_request());
        assert!(!dialogs.is_visible(FULLSCREEN_DIALOG));

        dialogs.tick(t1 + Duration::from_millis(299));
        assert!(!dialogs.is_visible(WELCOME_DIALOG));
        dialogs.tick(t1 + Duration::from_millis(300));
        assert!(dialogs.is_visible(WELCOME_DIALOG));
        assert!(dialogs.scroll_lock().is_disabled());

        dialogs.apply(DialogAction::StartJourney, t1);
        assert!(!dialogs.is_visible(WELCOME_DIALOG));
        assert!(!dialogs.scroll_lock().is_disabled());
        assert!(!dialogs.has_pending());
    }

    #[test]
    fn recommendations_lock_scrolling_while_open() {
        let mut dialogs = manager();
        let now = Instant::now();
        dialogs.apply(DialogAction::ShowRecommendations, now);
        assert!(dialogs.scroll_lock().is_disabled());
        dialogs.apply(DialogAction::CloseRecommendations, now);
        assert!(!dialogs.scroll_lock().is_disabled());
    }

    #[test]
    fn bakery_popup_carries_content() {
        let mut dialogs = manager();
        dialogs.show_bakery(BAKERIES[4].clone());
        assert!(dialogs.is_visible(BAKERY_POPUP));
        assert_eq!(dialogs.bakery().map(|b| b.name), Some("Violet Cakes"));
        dialogs.apply(DialogAction::CloseBakeryPopup, Instant::now());
        assert!(!dialogs.is_visible(BAKERY_POPUP));
    }
}
