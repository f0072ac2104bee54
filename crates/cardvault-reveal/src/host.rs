//! Host callbacks
//!
//! The view that owns a reveal session implements [`RevealHost`] to render
//! feedback and to act on deletion requests. The session never touches the
//! record store itself.

use cardvault_core::RecordId;
use tokio::sync::mpsc;

/// Callbacks a reveal session raises toward its host view
pub trait RevealHost {
    /// The PIN matched; the disclosure window is now open
    fn on_verified(&mut self);

    /// The session was torn down without touching the record
    fn on_cancelled(&mut self);

    /// The pad is locked; called on lock and on every second of countdown
    fn on_lockout(&mut self, remaining_seconds: u64);

    /// The disclosure window elapsed and sensitive fields are hidden again
    fn on_disclosure_expired(&mut self);

    /// The user asked to delete the record after forgetting its PIN
    fn on_delete_requested(&mut self, record_id: RecordId);

    /// A wrong PIN that did not lock the pad
    fn on_rejected(&mut self, _attempts_remaining: u32) {}

    /// The lockout elapsed and attempts were reset
    fn on_unlocked(&mut self) {}

    /// Ask the user to confirm deleting the record. Declining keeps the
    /// session locked.
    fn confirm_delete(&mut self, _record_id: RecordId) -> bool {
        true
    }
}

/// Host callbacks as values
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Verified,
    Rejected { attempts_remaining: u32 },
    Lockout { remaining_seconds: u64 },
    Unlocked,
    DisclosureExpired,
    DeleteRequested { record_id: RecordId },
    Cancelled,
}

/// Host that forwards every callback into a channel
///
/// Deletion is confirmed up front by whoever sends the forgot-PIN command.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<RevealEvent>,
}

impl ChannelHost {
    pub fn new(tx: mpsc::UnboundedSender<RevealEvent>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: RevealEvent) {
        // Receiver gone means the view is gone; nothing left to notify
        let _ = self.tx.send(event);
    }
}

impl RevealHost for ChannelHost {
    fn on_verified(&mut self) {
        self.emit(RevealEvent::Verified);
    }

    fn on_cancelled(&mut self) {
        self.emit(RevealEvent::Cancelled);
    }

    fn on_lockout(&mut self, remaining_seconds: u64) {
        self.emit(RevealEvent::Lockout { remaining_seconds });
    }

    fn on_disclosure_expired(&mut self) {
        self.emit(RevealEvent::DisclosureExpired);
    }

    fn on_delete_requested(&mut self, record_id: RecordId) {
        self.emit(RevealEvent::DeleteRequested { record_id });
    }

    fn on_rejected(&mut self, attempts_remaining: u32) {
        self.emit(RevealEvent::Rejected { attempts_remaining });
    }

    fn on_unlocked(&mut self) {
        self.emit(RevealEvent::Unlocked);
    }
}

/// Host that records every callback, for tests and scripted flows
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub events: Vec<RevealEvent>,
    /// Answer given to `confirm_delete`
    pub confirm: bool,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            confirm: true,
        }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that declines deletion
    pub fn declining() -> Self {
        Self {
            events: Vec::new(),
            confirm: false,
        }
    }

    pub fn count(&self, event: &RevealEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// Events other than per-second lockout updates
    pub fn transitions(&self) -> Vec<RevealEvent> {
        self.events
            .iter()
            .filter(|e| !matches!(e, RevealEvent::Lockout { .. }))
            .cloned()
            .collect()
    }
}

impl RevealHost for RecordingHost {
    fn on_verified(&mut self) {
        self.events.push(RevealEvent::Verified);
    }

    fn on_cancelled(&mut self) {
        self.events.push(RevealEvent::Cancelled);
    }

    fn on_lockout(&mut self, remaining_seconds: u64) {
        self.events.push(RevealEvent::Lockout { remaining_seconds });
    }

    fn on_disclosure_expired(&mut self) {
        self.events.push(RevealEvent::DisclosureExpired);
    }

    fn on_delete_requested(&mut self, record_id: RecordId) {
        self.events.push(RevealEvent::DeleteRequested { record_id });
    }

    fn on_rejected(&mut self, attempts_remaining: u32) {
        self.events.push(RevealEvent::Rejected { attempts_remaining });
    }

    fn on_unlocked(&mut self) {
        self.events.push(RevealEvent::Unlocked);
    }

    fn confirm_delete(&mut self, _record_id: RecordId) -> bool {
        self.confirm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_host_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut host = ChannelHost::new(tx);
        let id = RecordId::new();

        host.on_rejected(2);
        host.on_delete_requested(id);

        assert_eq!(
            rx.try_recv().unwrap(),
            RevealEvent::Rejected {
                attempts_remaining: 2
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            RevealEvent::DeleteRequested { record_id: id }
        );
    }

    #[test]
    fn test_channel_host_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut host = ChannelHost::new(tx);
        host.on_verified();
        assert!(host.confirm_delete(RecordId::new()));
    }

    #[test]
    fn test_recording_host_transitions() {
        let mut host = RecordingHost::new();
        host.on_lockout(30);
        host.on_lockout(29);
        host.on_unlocked();
        assert_eq!(host.transitions(), vec![RevealEvent::Unlocked]);
        assert_eq!(host.count(&RevealEvent::Lockout { remaining_seconds: 30 }), 1);
    }
}
