//! Single-shot disclosure window

use std::time::{Duration, Instant};

use crate::lockout::deadline_after;

/// Tracks how long sensitive fields may be shown after verification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisclosureTimer {
    visible_until: Option<Instant>,
}

impl DisclosureTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window. Restarting moves the deadline, it never stacks.
    pub fn start(&mut self, now: Instant, visibility: Duration) {
        self.visible_until = Some(deadline_after(now, visibility));
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        matches!(self.visible_until, Some(until) if now < until)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.visible_until
    }

    /// Whole seconds left in the window, rounded up
    pub fn remaining_seconds(&self, now: Instant) -> u64 {
        let Some(until) = self.visible_until else {
            return 0;
        };
        let remaining = until.saturating_duration_since(now);
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// Instant of the next whole-second change of `remaining_seconds`; the
    /// last one is the deadline itself
    pub fn next_tick(&self, now: Instant) -> Option<Instant> {
        let until = self.visible_until?;
        let secs = self.remaining_seconds(now);
        if secs == 0 {
            return Some(until);
        }
        Some(until - Duration::from_secs(secs - 1))
    }

    /// Close the window without reporting expiry
    pub fn cancel(&mut self) {
        self.visible_until = None;
    }

    /// Close the window if its deadline has passed.
    ///
    /// Returns `true` exactly once per started window.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.visible_until {
            Some(until) if now >= until => {
                self.visible_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_next_tick_walks_down_to_deadline() {
        let start = Instant::now();
        let mut timer = DisclosureTimer::new();
        assert!(timer.next_tick(start).is_none());

        timer.start(start, MINUTE);
        assert_eq!(timer.next_tick(start), Some(start + Duration::from_secs(1)));
        assert_eq!(
            timer.next_tick(start + Duration::from_millis(59_500)),
            Some(start + MINUTE)
        );
        // Overdue windows report the deadline so the caller polls at once
        assert_eq!(timer.next_tick(start + Duration::from_secs(61)), Some(start + MINUTE));
    }

    #[test]
    fn test_not_visible_until_started() {
        let timer = DisclosureTimer::new();
        let now = Instant::now();
        assert!(!timer.is_visible(now));
        assert_eq!(timer.remaining_seconds(now), 0);
        assert!(timer.deadline().is_none());
    }

    #[test]
    fn test_expires_once() {
        let start = Instant::now();
        let mut timer = DisclosureTimer::new();
        timer.start(start, MINUTE);

        assert!(timer.is_visible(start + Duration::from_secs(59)));
        assert_eq!(timer.remaining_seconds(start + Duration::from_millis(100)), 60);
        assert!(!timer.expire(start + Duration::from_secs(59)));

        let later = start + MINUTE;
        assert!(!timer.is_visible(later));
        assert!(timer.expire(later));
        assert!(!timer.expire(later + MINUTE));
    }

    #[test]
    fn test_restart_moves_deadline_forward() {
        let start = Instant::now();
        let mut timer = DisclosureTimer::new();
        timer.start(start, MINUTE);
        timer.start(start + Duration::from_secs(40), MINUTE);

        assert_eq!(timer.deadline(), Some(start + Duration::from_secs(100)));
        assert!(!timer.expire(start + MINUTE));
        assert!(timer.expire(start + Duration::from_secs(100)));
    }

    #[test]
    fn test_cancel_does_not_fire() {
        let start = Instant::now();
        let mut timer = DisclosureTimer::new();
        timer.start(start, MINUTE);
        timer.cancel();
        assert!(!timer.expire(start + MINUTE));
        assert!(!timer.is_visible(start));
    }
}
