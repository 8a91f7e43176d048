//! Single-slot trailing-edge debounce.
//!
//! The caller supplies `now` on every call, so the debouncer never reads a
//! clock itself.

use std::time::{Duration, Instant};

/// Fires once a quiet window has elapsed since the last `schedule`.
///
/// Scheduling again before the deadline replaces it. Bursts collapse to one
/// firing.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Quiet window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the deadline at `now + window`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is armed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The armed deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true, and disarms, when the deadline has been reached.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(Instant::now() + WINDOW * 10));
    }

    #[test]
    fn test_fires_after_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(t0);

        assert!(!debouncer.fire_if_due(t0 + Duration::from_millis(499)));
        assert!(debouncer.fire_if_due(t0 + WINDOW));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(t0 + WINDOW * 2));
    }

    #[test]
    fn test_reschedule_pushes_deadline() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(t0);
        debouncer.schedule(t0 + Duration::from_millis(300));
        debouncer.schedule(t0 + Duration::from_millis(600));

        assert_eq!(debouncer.deadline(), Some(t0 + Duration::from_millis(1_100)));
        assert!(!debouncer.fire_if_due(t0 + Duration::from_millis(1_000)));
        assert!(debouncer.fire_if_due(t0 + Duration::from_millis(1_100)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(t0);
        debouncer.cancel();
        assert!(!debouncer.fire_if_due(t0 + WINDOW));
    }

    proptest! {
        #[test]
        fn prop_burst_fires_once_after_last(gaps in prop::collection::vec(0u64..499, 1..20)) {
            let t0 = Instant::now();
            let mut debouncer = Debouncer::new(WINDOW);
            let mut last = t0;
            for gap in gaps {
                last += Duration::from_millis(gap);
                prop_assert!(!debouncer.fire_if_due(last));
                debouncer.schedule(last);
            }
            prop_assert!(!debouncer.fire_if_due(last + WINDOW - Duration::from_millis(1)));
            prop_assert!(debouncer.fire_if_due(last + WINDOW));
            prop_assert!(!debouncer.fire_if_due(last + WINDOW * 3));
        }
    }
}
