//! Trailing-edge debounce.
//!
//! Editors save in bursts (write, truncate, rename); acting on every
//! notification would reload the UI several times per keystroke. The
//! deadline restarts on each poke, so only the last event in a burst fires
//! and a burst collapses into exactly one action.
//!
//! Clock-injected: callers pass `Instant`s, tests pass synthetic ones.

use std::time::{Duration, Instant};

/// Delay applied after the last change notification before reloading.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an event at `now`, (re)starting the delay window. A pending
    /// deadline is implicitly cancelled and replaced.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the armed deadline has passed at `now`, clear it and report true.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any armed deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn fires_after_window() {
        let mut d = Debounce::new(WINDOW);
        let t0 = Instant::now();

        d.poke(t0);
        assert!(!d.fire_due(t0 + Duration::from_millis(50)));
        assert!(d.fire_due(t0 + Duration::from_millis(100)));
        assert!(!d.is_pending());
    }

    #[test]
    fn burst_coalesces_to_one_fire() {
        let mut d = Debounce::new(WINDOW);
        let t0 = Instant::now();

        // Three pokes 20ms apart, all inside the window.
        d.poke(t0);
        d.poke(t0 + Duration::from_millis(20));
        d.poke(t0 + Duration::from_millis(40));

        // Window restarted from the last poke.
        assert!(!d.fire_due(t0 + Duration::from_millis(110)));
        assert!(d.fire_due(t0 + Duration::from_millis(140)));
        assert!(!d.fire_due(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn cancel_disarms() {
        let mut d = Debounce::new(WINDOW);
        let t0 = Instant::now();
        d.poke(t0);
        d.cancel();
        assert!(!d.fire_due(t0 + Duration::from_millis(200)));
    }
}
