#![no_main]

use arbitrary::Arbitrary;
use cardvault_core::{Pin, RecordId, PIN_LENGTH};
use cardvault_reveal::{
    ManualClock, PadState, RecordingHost, RevealCommand, RevealPolicy, RevealSession,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Digit(u8),
    Backspace,
    Clear,
    Submit,
    ForgotPin,
    ReopenPad,
    Cancel,
    /// Advance the clock by this many tenths of a second
    Wait(u16),
}

#[derive(Arbitrary, Debug)]
struct Input {
    confirm_delete: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let clock = ManualClock::new();
    let host = if input.confirm_delete {
        RecordingHost::new()
    } else {
        RecordingHost::declining()
    };
    let policy = RevealPolicy::default();
    let mut session = RevealSession::with_clock(
        RecordId::new(),
        Pin::new("1234").expect("valid pin"),
        policy,
        host,
        clock.clone(),
    );

    for op in input.ops {
        let command = match op {
            Op::Digit(d) => RevealCommand::Digit(d % 12),
            Op::Backspace => RevealCommand::Backspace,
            Op::Clear => RevealCommand::Clear,
            Op::Submit => RevealCommand::Submit,
            Op::ForgotPin => RevealCommand::ForgotPin,
            Op::ReopenPad => RevealCommand::ReopenPad,
            Op::Cancel => RevealCommand::Cancel,
            Op::Wait(tenths) => {
                clock.advance(std::time::Duration::from_millis(u64::from(tenths) * 100));
                session.poll();
                continue;
            }
        };
        session.handle(command);

        let view = session.view();
        assert!(view.entered_digit_count <= PIN_LENGTH);
        assert!(view.attempt_count <= policy.lockout.max_attempts);
        assert_eq!(view.locked, view.state == PadState::Locked);
        assert_eq!(view.forgot_pin_available, view.locked);
        if view.locked {
            assert!(view.lock_remaining_seconds <= policy.lockout.lockout_secs());
        }
        if view.state == PadState::Closed {
            assert!(!view.visible);
            assert!(session.next_deadline().is_none());
        }
    }
});
