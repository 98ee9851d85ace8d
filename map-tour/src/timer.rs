use std::time::{Duration, Instant};

/// A one-shot timer polled from the frame loop.
///
/// Scheduling again supersedes the pending deadline; there is no queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer `delay` after `now`. A deadline past what `Instant`
    /// can represent leaves the timer idle.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = now.checked_add(delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the timer fires, zero if it is already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_millis(50));

        assert!(!timer.fire(t0 + Duration::from_millis(49)));
        assert!(timer.fire(t0 + Duration::from_millis(50)));
        assert!(!timer.fire(t0 + Duration::from_millis(51)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn rescheduling_supersedes() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_millis(100));
        timer.schedule(t0 + Duration::from_millis(80), Duration::from_millis(100));

        assert!(!timer.fire(t0 + Duration::from_millis(120)));
        assert_eq!(
            timer.remaining(t0 + Duration::from_millis(120)),
            Some(Duration::from_millis(60))
        );
        assert!(timer.fire(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn unrepresentable_deadline_stays_idle() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::MAX);
        assert!(!timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_secs(1)));
        assert_eq!(timer.remaining(t0), None);
    }
}
