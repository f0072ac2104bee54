//! Lockout and disclosure policies
//!
//! A reveal session allows a few wrong PINs, then locks the pad for a fixed
//! cooldown. Once the cooldown elapses the attempt counter starts over.
//!
//! - 1-2 failures: message with the attempts left
//! - 3 failures: 30 second lockout
//! - lockout expiry: attempts reset to 0

use std::time::Duration;

/// Longest lockout or disclosure window a policy will hold
pub const MAX_POLICY_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed-threshold lockout policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Wrong PINs allowed before the pad locks
    pub max_attempts: u32,
    /// How long the pad stays locked
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_duration: Duration::from_secs(30),
        }
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout_duration: lockout_duration.min(MAX_POLICY_DURATION),
        }
    }

    /// Check if the pad should be locked
    pub fn is_locked(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.max_attempts
    }

    pub fn attempts_remaining(&self, failed_attempts: u32) -> u32 {
        self.max_attempts.saturating_sub(failed_attempts)
    }

    /// Lockout length in whole seconds
    pub fn lockout_secs(&self) -> u64 {
        self.lockout_duration.as_secs()
    }

    /// User-facing message after a wrong PIN that did not lock the pad
    pub fn rejection_message(&self, failed_attempts: u32) -> String {
        rejection_text(self.attempts_remaining(failed_attempts))
    }

    /// Human-readable description of the current state
    pub fn describe(&self, failed_attempts: u32) -> String {
        if self.is_locked(failed_attempts) {
            format!(
                "Too many failed attempts. Locked for {} seconds",
                self.lockout_secs()
            )
        } else {
            format!(
                "{} attempts remaining",
                self.attempts_remaining(failed_attempts)
            )
        }
    }
}

/// Message shown after a wrong PIN with `attempts_remaining` tries left
pub fn rejection_text(attempts_remaining: u32) -> String {
    format!("Incorrect PIN. {} attempts remaining.", attempts_remaining)
}

/// How long sensitive fields stay visible after a successful verification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisclosurePolicy {
    pub visibility: Duration,
}

impl Default for DisclosurePolicy {
    fn default() -> Self {
        Self {
            visibility: Duration::from_secs(60),
        }
    }
}

impl DisclosurePolicy {
    pub fn new(visibility: Duration) -> Self {
        Self {
            visibility: visibility.min(MAX_POLICY_DURATION),
        }
    }
}

/// Both policies a reveal session runs under
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealPolicy {
    pub lockout: LockoutPolicy,
    pub disclosure: DisclosurePolicy,
}

impl RevealPolicy {
    pub fn new(lockout: LockoutPolicy, disclosure: DisclosurePolicy) -> Self {
        Self {
            lockout,
            disclosure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RevealPolicy::default();
        assert_eq!(policy.lockout.max_attempts, 3);
        assert_eq!(policy.lockout.lockout_secs(), 30);
        assert_eq!(policy.disclosure.visibility, Duration::from_secs(60));
    }

    #[test]
    fn test_lock_threshold() {
        let policy = LockoutPolicy::default();
        assert!(!policy.is_locked(0));
        assert!(!policy.is_locked(2));
        assert!(policy.is_locked(3));
        assert!(policy.is_locked(4));
    }

    #[test]
    fn test_attempts_remaining_saturates() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.attempts_remaining(1), 2);
        assert_eq!(policy.attempts_remaining(3), 0);
        assert_eq!(policy.attempts_remaining(10), 0);
    }

    #[test]
    fn test_messages() {
        let policy = LockoutPolicy::default();
        assert_eq!(
            policy.rejection_message(1),
            "Incorrect PIN. 2 attempts remaining."
        );
        assert_eq!(policy.describe(0), "3 attempts remaining");
        assert!(policy.describe(3).contains("30 seconds"));
    }

    #[test]
    fn test_zero_threshold_is_clamped() {
        let policy = LockoutPolicy::new(0, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_durations_are_capped() {
        let lockout = LockoutPolicy::new(3, Duration::from_secs(u64::MAX));
        assert_eq!(lockout.lockout_duration, MAX_POLICY_DURATION);

        let disclosure = DisclosurePolicy::new(Duration::MAX);
        assert_eq!(disclosure.visibility, MAX_POLICY_DURATION);
    }
}
