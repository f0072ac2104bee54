//! PIN-gated reveal session
//!
//! A [`RevealSession`] owns everything a single reveal interaction needs:
//! the digits typed so far, the failed attempt counter, the lockout
//! countdown and the disclosure window. It is synchronous and never sleeps.
//! Time only moves when the injected [`Clock`] says so, and every
//! operation first catches up on any deadline that has passed. The async
//! [`RevealDriver`](crate::RevealDriver) wakes it at [`next_deadline`].
//!
//! Invalid operations (typing while locked, submitting three digits, acting
//! on a closed session) return [`PadResponse::Ignored`] and change nothing.
//!
//! [`next_deadline`]: RevealSession::next_deadline

use std::time::Instant;

use cardvault_core::{Pin, RecordId, PIN_LENGTH};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::clock::{Clock, SystemClock};
use crate::disclosure::DisclosureTimer;
use crate::host::RevealHost;
use crate::lockout::LockoutCountdown;
use crate::policy::RevealPolicy;

/// Where the pad is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadState {
    /// Accepting digits
    Entering,
    /// Too many wrong PINs; input disabled until the countdown ends
    Locked,
    /// PIN matched; sensitive fields visible until the window closes
    Verified,
    /// Torn down; every operation is ignored
    Closed,
}

/// Outcome of a single pad operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadResponse {
    /// The operation changed the pad
    Accepted,
    /// The operation was not valid in the current state
    Ignored,
    /// The PIN matched
    Verified,
    /// The PIN did not match and the pad is still open
    Rejected { attempts_remaining: u32 },
    /// The PIN did not match and the pad locked
    LockedOut { seconds: u64 },
    /// Deletion of the record was requested and the session torn down
    DeleteRequested,
    /// The host declined the deletion; the pad stays locked
    DeleteDeclined,
    /// The session was cancelled
    Closed,
}

/// Pad input as a value, for hosts that route keys through a channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealCommand {
    Digit(u8),
    Backspace,
    Clear,
    Submit,
    ForgotPin,
    /// Return from the details view to the pad to verify again
    ReopenPad,
    Cancel,
}

/// Read model hosts render from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealView {
    pub record_id: RecordId,
    pub state: PadState,
    pub entered_digit_count: usize,
    pub attempt_count: u32,
    pub attempts_remaining: u32,
    pub locked: bool,
    pub lock_remaining_seconds: u64,
    pub visible: bool,
    pub visible_remaining_seconds: u64,
    /// Last error text, e.g. the attempts-remaining message
    pub message: Option<String>,
    pub forgot_pin_available: bool,
    pub can_submit: bool,
}

/// One reveal interaction for one record
pub struct RevealSession<H, C = SystemClock> {
    record_id: RecordId,
    pin: Pin,
    policy: RevealPolicy,
    clock: C,
    host: H,
    state: PadState,
    entered: Zeroizing<String>,
    attempt_count: u32,
    countdown: Option<LockoutCountdown>,
    announced_seconds: Option<u64>,
    disclosure: DisclosureTimer,
    message: Option<String>,
}

impl<H: RevealHost> RevealSession<H, SystemClock> {
    /// Start a session on the wall clock
    pub fn new(record_id: RecordId, pin: Pin, policy: RevealPolicy, host: H) -> Self {
        Self::with_clock(record_id, pin, policy, host, SystemClock)
    }
}

impl<H: RevealHost, C: Clock> RevealSession<H, C> {
    /// Start a session on an injected clock
    pub fn with_clock(record_id: RecordId, pin: Pin, policy: RevealPolicy, host: H, clock: C) -> Self {
        debug!("Reveal session opened for record {}", record_id.short());
        Self {
            record_id,
            pin,
            policy,
            clock,
            host,
            state: PadState::Entering,
            entered: Zeroizing::new(String::with_capacity(PIN_LENGTH)),
            attempt_count: 0,
            countdown: None,
            announced_seconds: None,
            disclosure: DisclosureTimer::new(),
            message: None,
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn policy(&self) -> &RevealPolicy {
        &self.policy
    }

    pub fn state(&self) -> PadState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == PadState::Closed
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Dispatch a command to the matching operation
    pub fn handle(&mut self, command: RevealCommand) -> PadResponse {
        match command {
            RevealCommand::Digit(d) => self.append_digit(d),
            RevealCommand::Backspace => self.backspace(),
            RevealCommand::Clear => self.clear(),
            RevealCommand::Submit => self.submit(),
            RevealCommand::ForgotPin => self.forgot_pin(),
            RevealCommand::ReopenPad => self.reopen_pad(),
            RevealCommand::Cancel => self.cancel(),
        }
    }

    pub fn append_digit(&mut self, digit: u8) -> PadResponse {
        self.poll();
        if digit > 9 || self.state != PadState::Entering || self.entered.len() >= PIN_LENGTH {
            return PadResponse::Ignored;
        }
        self.entered.push(char::from(b'0' + digit));
        PadResponse::Accepted
    }

    pub fn backspace(&mut self) -> PadResponse {
        self.poll();
        if self.state != PadState::Entering {
            return PadResponse::Ignored;
        }
        match self.entered.pop() {
            Some(_) => PadResponse::Accepted,
            None => PadResponse::Ignored,
        }
    }

    pub fn clear(&mut self) -> PadResponse {
        self.poll();
        if self.state != PadState::Entering || self.entered.is_empty() {
            return PadResponse::Ignored;
        }
        self.entered.clear();
        PadResponse::Accepted
    }

    /// Compare the entered digits with the record PIN
    pub fn submit(&mut self) -> PadResponse {
        self.poll();
        if self.state != PadState::Entering || self.entered.len() != PIN_LENGTH {
            return PadResponse::Ignored;
        }

        let matched = self.pin.matches(&self.entered);
        self.entered.clear();
        let now = self.clock.now();

        if matched {
            self.attempt_count = 0;
            self.message = None;
            self.state = PadState::Verified;
            self.disclosure.start(now, self.policy.disclosure.visibility);
            info!("PIN verified for record {}", self.record_id.short());
            self.host.on_verified();
            return PadResponse::Verified;
        }

        self.attempt_count += 1;
        let lockout = self.policy.lockout;
        warn!(
            "Incorrect PIN for record {} ({}/{})",
            self.record_id.short(),
            self.attempt_count,
            lockout.max_attempts
        );

        if lockout.is_locked(self.attempt_count) {
            let countdown = LockoutCountdown::start(now, lockout.lockout_duration);
            let seconds = countdown.remaining_seconds(now);
            self.countdown = Some(countdown);
            self.announced_seconds = Some(seconds);
            self.state = PadState::Locked;
            self.message = Some(lockout.describe(self.attempt_count));
            info!(
                "Record {} locked for {} seconds",
                self.record_id.short(),
                seconds
            );
            self.host.on_lockout(seconds);
            PadResponse::LockedOut { seconds }
        } else {
            let attempts_remaining = lockout.attempts_remaining(self.attempt_count);
            self.message = Some(lockout.rejection_message(self.attempt_count));
            self.host.on_rejected(attempts_remaining);
            PadResponse::Rejected { attempts_remaining }
        }
    }

    /// Lift the lock once its countdown has run out
    pub fn on_lockout_expire(&mut self) -> PadResponse {
        if self.state != PadState::Locked {
            return PadResponse::Ignored;
        }
        let now = self.clock.now();
        match self.countdown {
            Some(countdown) if countdown.is_expired(now) => {
                self.unlock();
                PadResponse::Accepted
            }
            _ => PadResponse::Ignored,
        }
    }

    /// Give up on the PIN and ask the host to delete the record
    pub fn forgot_pin(&mut self) -> PadResponse {
        self.poll();
        if self.state != PadState::Locked {
            return PadResponse::Ignored;
        }
        if !self.host.confirm_delete(self.record_id) {
            debug!("Deletion of record {} declined", self.record_id.short());
            return PadResponse::DeleteDeclined;
        }
        info!("Deletion requested for record {}", self.record_id.short());
        self.teardown();
        self.host.on_delete_requested(self.record_id);
        PadResponse::DeleteRequested
    }

    /// Leave the details view for the pad. The disclosure window keeps
    /// running; verifying again moves its deadline forward.
    pub fn reopen_pad(&mut self) -> PadResponse {
        self.poll();
        if self.state != PadState::Verified {
            return PadResponse::Ignored;
        }
        self.state = PadState::Entering;
        self.entered.clear();
        PadResponse::Accepted
    }

    /// Tear the session down without touching the record
    pub fn cancel(&mut self) -> PadResponse {
        if self.state == PadState::Closed {
            return PadResponse::Ignored;
        }
        debug!("Reveal session cancelled for record {}", self.record_id.short());
        self.teardown();
        self.host.on_cancelled();
        PadResponse::Closed
    }

    /// Catch up on every deadline that has passed.
    ///
    /// Raises `on_lockout` whenever the displayed countdown changes, lifts
    /// an expired lock and closes an elapsed disclosure window.
    pub fn poll(&mut self) {
        if self.state == PadState::Closed {
            return;
        }
        let now = self.clock.now();

        if self.state == PadState::Locked {
            if let Some(countdown) = self.countdown {
                if countdown.is_expired(now) {
                    self.unlock();
                } else {
                    let seconds = countdown.remaining_seconds(now);
                    if self.announced_seconds != Some(seconds) {
                        self.announced_seconds = Some(seconds);
                        self.host.on_lockout(seconds);
                    }
                }
            }
        }

        if self.disclosure.expire(now) {
            info!("Disclosure window closed for record {}", self.record_id.short());
            self.host.on_disclosure_expired();
            if self.state == PadState::Verified {
                self.teardown();
            }
        }
    }

    /// Earliest instant at which the view changes or [`poll`](Self::poll)
    /// has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.state == PadState::Closed {
            return None;
        }
        let now = self.clock.now();
        let tick = match (self.state, self.countdown) {
            (PadState::Locked, Some(countdown)) => countdown.next_tick(now).or(Some(now)),
            _ => None,
        };
        match (tick, self.disclosure.next_tick(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Snapshot of the pad for rendering
    pub fn view(&self) -> RevealView {
        let now = self.clock.now();
        let locked = self.state == PadState::Locked;
        let lock_remaining_seconds = match (locked, self.countdown) {
            (true, Some(countdown)) => countdown.remaining_seconds(now),
            _ => 0,
        };
        RevealView {
            record_id: self.record_id,
            state: self.state,
            entered_digit_count: self.entered.len(),
            attempt_count: self.attempt_count,
            attempts_remaining: self.policy.lockout.attempts_remaining(self.attempt_count),
            locked,
            lock_remaining_seconds,
            visible: self.disclosure.is_visible(now),
            visible_remaining_seconds: self.disclosure.remaining_seconds(now),
            message: self.message.clone(),
            forgot_pin_available: locked,
            can_submit: self.state == PadState::Entering && self.entered.len() == PIN_LENGTH,
        }
    }

    fn unlock(&mut self) {
        self.attempt_count = 0;
        self.countdown = None;
        self.announced_seconds = None;
        self.entered.clear();
        self.message = None;
        self.state = PadState::Entering;
        info!("Lockout expired for record {}", self.record_id.short());
        self.host.on_unlocked();
    }

    fn teardown(&mut self) {
        self.state = PadState::Closed;
        self.countdown = None;
        self.announced_seconds = None;
        self.disclosure.cancel();
        self.entered.clear();
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::{RecordingHost, RevealEvent};

    fn session() -> (RevealSession<RecordingHost, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = RevealSession::with_clock(
            RecordId::new(),
            Pin::new("4321").unwrap(),
            RevealPolicy::default(),
            RecordingHost::new(),
            clock.clone(),
        );
        (session, clock)
    }

    fn type_pin(session: &mut RevealSession<RecordingHost, ManualClock>, pin: &str) {
        for b in pin.bytes() {
            session.append_digit(b - b'0');
        }
    }

    #[test]
    fn test_fifth_digit_ignored() {
        let (mut s, _) = session();
        type_pin(&mut s, "1234");
        assert_eq!(s.append_digit(5), PadResponse::Ignored);
        assert_eq!(s.view().entered_digit_count, 4);
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let (mut s, _) = session();
        assert_eq!(s.append_digit(10), PadResponse::Ignored);
        assert_eq!(s.view().entered_digit_count, 0);
    }

    #[test]
    fn test_backspace_and_clear_at_bounds() {
        let (mut s, _) = session();
        assert_eq!(s.backspace(), PadResponse::Ignored);
        assert_eq!(s.clear(), PadResponse::Ignored);
        type_pin(&mut s, "12");
        assert_eq!(s.backspace(), PadResponse::Accepted);
        assert_eq!(s.view().entered_digit_count, 1);
        assert_eq!(s.clear(), PadResponse::Accepted);
        assert_eq!(s.view().entered_digit_count, 0);
    }

    #[test]
    fn test_short_submit_ignored() {
        let (mut s, _) = session();
        type_pin(&mut s, "432");
        assert!(!s.view().can_submit);
        assert_eq!(s.submit(), PadResponse::Ignored);
        assert_eq!(s.view().attempt_count, 0);
        assert!(s.host().events.is_empty());
    }

    #[test]
    fn test_input_ignored_while_locked() {
        let (mut s, _) = session();
        for pin in ["1111", "2222", "3333"] {
            type_pin(&mut s, pin);
            s.submit();
        }
        assert_eq!(s.state(), PadState::Locked);
        assert_eq!(s.append_digit(4), PadResponse::Ignored);
        assert_eq!(s.backspace(), PadResponse::Ignored);
        assert_eq!(s.clear(), PadResponse::Ignored);
        assert_eq!(s.submit(), PadResponse::Ignored);
        assert_eq!(s.view().attempt_count, 3);
    }

    #[test]
    fn test_on_lockout_expire_requires_elapsed_countdown() {
        let (mut s, clock) = session();
        assert_eq!(s.on_lockout_expire(), PadResponse::Ignored);
        for pin in ["1111", "2222", "3333"] {
            type_pin(&mut s, pin);
            s.submit();
        }
        clock.advance_secs(10);
        assert_eq!(s.on_lockout_expire(), PadResponse::Ignored);
        clock.advance_secs(20);
        assert_eq!(s.on_lockout_expire(), PadResponse::Accepted);
        assert_eq!(s.state(), PadState::Entering);
        assert_eq!(s.view().attempt_count, 0);
    }

    #[test]
    fn test_forgot_pin_requires_lock() {
        let (mut s, _) = session();
        assert_eq!(s.forgot_pin(), PadResponse::Ignored);
        assert!(!s.view().forgot_pin_available);
        assert!(!s.is_closed());
    }

    #[test]
    fn test_declined_delete_keeps_lock() {
        let clock = ManualClock::new();
        let mut s = RevealSession::with_clock(
            RecordId::new(),
            Pin::new("4321").unwrap(),
            RevealPolicy::default(),
            RecordingHost::declining(),
            clock.clone(),
        );
        for pin in ["1111", "2222", "3333"] {
            type_pin(&mut s, pin);
            s.submit();
        }
        assert_eq!(s.forgot_pin(), PadResponse::DeleteDeclined);
        assert_eq!(s.state(), PadState::Locked);
        assert!(!s
            .host()
            .events
            .iter()
            .any(|e| matches!(e, RevealEvent::DeleteRequested { .. })));
    }

    #[test]
    fn test_cancel_from_verified_stops_timer() {
        let (mut s, clock) = session();
        type_pin(&mut s, "4321");
        s.submit();
        assert_eq!(s.cancel(), PadResponse::Closed);
        assert!(s.next_deadline().is_none());

        clock.advance_secs(120);
        s.poll();
        assert_eq!(
            s.host().events,
            vec![RevealEvent::Verified, RevealEvent::Cancelled]
        );
        assert_eq!(s.cancel(), PadResponse::Ignored);
    }

    #[test]
    fn test_reverify_moves_window_forward() {
        let (mut s, clock) = session();
        type_pin(&mut s, "4321");
        s.submit();

        clock.advance_secs(40);
        assert_eq!(s.reopen_pad(), PadResponse::Accepted);
        assert!(s.view().visible);
        type_pin(&mut s, "4321");
        assert_eq!(s.submit(), PadResponse::Verified);

        clock.advance_secs(59);
        s.poll();
        assert!(s.view().visible);
        assert_eq!(s.host().count(&RevealEvent::DisclosureExpired), 0);

        clock.advance_secs(1);
        s.poll();
        assert!(!s.view().visible);
        assert_eq!(s.host().count(&RevealEvent::DisclosureExpired), 1);
        assert!(s.is_closed());
    }

    #[test]
    fn test_window_expiry_while_pad_reopened_keeps_pad() {
        let (mut s, clock) = session();
        type_pin(&mut s, "4321");
        s.submit();
        s.reopen_pad();

        clock.advance_secs(60);
        s.poll();
        assert_eq!(s.host().count(&RevealEvent::DisclosureExpired), 1);
        assert_eq!(s.state(), PadState::Entering);
    }

    #[test]
    fn test_next_deadline() {
        let (mut s, clock) = session();
        assert!(s.next_deadline().is_none());

        for pin in ["1111", "2222", "3333"] {
            type_pin(&mut s, pin);
            s.submit();
        }
        let start = clock.now();
        assert_eq!(s.next_deadline(), Some(start + std::time::Duration::from_secs(1)));

        clock.advance_secs(30);
        s.poll();
        type_pin(&mut s, "4321");
        s.submit();
        assert_eq!(
            s.next_deadline(),
            Some(clock.now() + std::time::Duration::from_secs(1))
        );
        clock.advance_secs(59);
        assert_eq!(s.next_deadline(), Some(clock.now() + std::time::Duration::from_secs(1)));
    }

    #[test]
    fn test_handle_dispatch() {
        let (mut s, _) = session();
        for d in [4, 3, 2, 1] {
            assert_eq!(s.handle(RevealCommand::Digit(d)), PadResponse::Accepted);
        }
        assert_eq!(s.handle(RevealCommand::Submit), PadResponse::Verified);
        assert_eq!(s.handle(RevealCommand::Cancel), PadResponse::Closed);
    }
}
