//! Card Vault Reveal - PIN-gated disclosure of sensitive record fields
//!
//! This crate provides:
//! - Lockout policy and countdown after repeated wrong PINs
//! - Single-shot disclosure window after a successful verification
//! - The reveal session state machine and its host callbacks
//! - An async driver that owns the session's timers

pub mod clock;
pub mod disclosure;
pub mod driver;
pub mod error;
pub mod host;
pub mod lockout;
pub mod policy;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use disclosure::DisclosureTimer;
pub use driver::{RevealDriver, RevealHandle};
pub use error::{Result, RevealError};
pub use host::{ChannelHost, RecordingHost, RevealEvent, RevealHost};
pub use lockout::LockoutCountdown;
pub use policy::{
    rejection_text, DisclosurePolicy, LockoutPolicy, RevealPolicy, MAX_POLICY_DURATION,
};
pub use session::{PadResponse, PadState, RevealCommand, RevealSession, RevealView};
