//! Lockout countdown

use std::time::{Duration, Instant};

use crate::policy::MAX_POLICY_DURATION;

/// Countdown started when the pad locks
///
/// The countdown is derived from a fixed deadline rather than decremented
/// by a timer, so a late tick never drifts the remaining time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockoutCountdown {
    until: Instant,
}

impl LockoutCountdown {
    /// Durations beyond [`MAX_POLICY_DURATION`] are capped
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self {
            until: deadline_after(now, duration),
        }
    }

    /// Instant at which the lock lifts
    pub fn until(&self) -> Instant {
        self.until
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.until().saturating_duration_since(now)
    }

    /// Whole seconds left, rounded up so a fresh lock reads the full duration
    pub fn remaining_seconds(&self, now: Instant) -> u64 {
        let remaining = self.remaining(now);
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.until()
    }

    /// Instant of the next whole-second change of `remaining_seconds`, or
    /// `None` once expired
    pub fn next_tick(&self, now: Instant) -> Option<Instant> {
        let secs = self.remaining_seconds(now);
        if secs == 0 {
            return None;
        }
        Some(self.until - Duration::from_secs(secs - 1))
    }
}

/// `now + duration`, capped so the addition cannot overflow
pub(crate) fn deadline_after(now: Instant, duration: Duration) -> Instant {
    let duration = duration.min(MAX_POLICY_DURATION);
    now.checked_add(duration).unwrap_or(now)
}
