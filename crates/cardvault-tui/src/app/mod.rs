//! Application state and event handling

mod state;

pub use state::{AppState, ConfirmAction, Screen};

use std::time::Duration;

use anyhow::Result;
use cardvault_core::{notice, RecordId, RecordKind};
use cardvault_reveal::{
    rejection_text, PadResponse, PadState, RevealDriver, RevealEvent, RevealHandle,
};
use cardvault_store::StoreClient;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ui::{
    self,
    components::notification::{Notification, NotificationManager},
    Theme,
};

/// Redraw and toast tick interval
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// A running reveal session and its callback stream
struct ActiveReveal {
    handle: RevealHandle,
    events: mpsc::UnboundedReceiver<RevealEvent>,
}

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Visual theme
    pub theme: Theme,

    /// Toast notifications
    pub notifications: NotificationManager,

    /// Whether the app should quit
    pub should_quit: bool,

    client: StoreClient,
    reveal: Option<ActiveReveal>,
}

impl App {
    /// Create a new application instance
    pub fn new(client: StoreClient) -> Self {
        let owner = client
            .session()
            .map(|s| s.user_id.to_string())
            .unwrap_or_default();
        Self {
            state: AppState::new(owner),
            theme: Theme::default(),
            notifications: NotificationManager::new(),
            should_quit: false,
            client,
            reveal: None,
        }
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut keys = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_RATE);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            tokio::select! {
                event = keys.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                event = next_reveal_event(&mut self.reveal) => match event {
                    Some(event) => self.on_reveal_event(event).await,
                    None => debug!("Reveal event stream closed"),
                },
                _ = ticker.tick() => self.notifications.tick(),
            }

            self.sync_reveal().await;
        }

        Ok(())
    }

    /// Cancel any running reveal session
    pub async fn shutdown(&mut self) {
        if let Some(active) = self.reveal.take() {
            active.handle.shutdown().await;
        }
        self.state.close_reveal();
    }

    /// Shut down and release the store
    pub async fn close(mut self) {
        self.shutdown().await;
        self.client.close();
    }

    /// Re-read the record list from the store
    pub async fn reload_records(&mut self) {
        match self.client.list().await {
            Ok(records) => self.state.set_records(records),
            Err(e) => {
                warn!("Failed to load records: {}", e);
                self.notifications
                    .push(Notification::error(format!("Failed to load records: {}", e)));
            }
        }
    }

    /// Handle key press events
    pub async fn handle_key(&mut self, key: KeyCode) {
        match self.state.current_screen {
            Screen::Records => self.handle_records_key(key).await,
            Screen::PinEntry => self.handle_pin_entry_key(key).await,
            Screen::Lockout => self.handle_lockout_key(key).await,
            Screen::Details => self.handle_details_key(key).await,
            Screen::ConfirmDelete(action) => self.handle_confirm_key(key, action).await,
        }
        self.sync_reveal().await;
    }

    async fn handle_records_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Char('r') => self.reload_records().await,
            KeyCode::Enter => self.open_selected().await,
            KeyCode::Char('d') => {
                if let Some(stored) = self.state.selected_record() {
                    self.state.current_screen =
                        Screen::ConfirmDelete(ConfirmAction::DeleteRecord(stored.id));
                }
            }
            _ => {}
        }
    }

    async fn handle_pin_entry_key(&mut self, key: KeyCode) {
        let Some(handle) = self.reveal.as_ref().map(|r| &r.handle) else {
            return;
        };
        self.state.status_message = None;
        let result = match key {
            KeyCode::Char(c) if c.is_ascii_digit() => handle.append_digit(c as u8 - b'0').await,
            KeyCode::Backspace => handle.backspace().await,
            KeyCode::Delete => handle.clear().await,
            KeyCode::Enter => handle.submit().await,
            KeyCode::Esc => handle.cancel().await,
            _ => return,
        };
        if key == KeyCode::Enter && result == Ok(PadResponse::Ignored) {
            self.state.status_message = Some("Enter all 4 digits".to_string());
        }
    }

    async fn handle_lockout_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('f') => {
                let available = self
                    .reveal
                    .as_ref()
                    .map(|r| r.handle.view().forgot_pin_available)
                    .unwrap_or(false);
                if available {
                    self.state.current_screen = Screen::ConfirmDelete(ConfirmAction::ForgotPin);
                }
            }
            KeyCode::Esc => self.cancel_reveal().await,
            _ => {}
        }
    }

    async fn handle_details_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('p') => {
                if let Some(active) = &self.reveal {
                    let _ = active.handle.reopen_pad().await;
                    self.state.clear_messages();
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.reveal.is_some() {
                    self.cancel_reveal().await;
                } else {
                    self.state.close_reveal();
                }
            }
            _ => {}
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyCode, action: ConfirmAction) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => match action {
                ConfirmAction::ForgotPin => {
                    if let Some(active) = &self.reveal {
                        let response = active.handle.forgot_pin().await;
                        if response != Ok(PadResponse::DeleteRequested) {
                            self.state.current_screen = Screen::Lockout;
                        }
                    }
                }
                ConfirmAction::DeleteRecord(id) => {
                    self.state.current_screen = Screen::Records;
                    self.delete_record(id).await;
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state.current_screen = match action {
                    ConfirmAction::ForgotPin => Screen::Lockout,
                    ConfirmAction::DeleteRecord(_) => Screen::Records,
                };
            }
            _ => {}
        }
    }

    /// Start a reveal session for the selected record
    async fn open_selected(&mut self) {
        let Some(stored) = self.state.selected_record().cloned() else {
            return;
        };
        self.state.clear_messages();
        match self.client.record_pin(stored.id).await {
            Ok(Some(pin)) => {
                let (handle, events) =
                    RevealDriver::spawn(stored.id, pin, self.client.reveal_policy());
                self.reveal = Some(ActiveReveal { handle, events });
                self.state.revealed = Some(stored);
                self.state.current_screen = Screen::PinEntry;
            }
            Ok(None) => {
                self.state.revealed = Some(stored);
                self.state.view = None;
                self.state.current_screen = Screen::Details;
            }
            Err(e) => {
                warn!("Failed to open record {}: {}", stored.id.short(), e);
                self.notifications
                    .push(Notification::error(format!("Failed to open record: {}", e)));
            }
        }
    }

    async fn cancel_reveal(&mut self) {
        if let Some(active) = &self.reveal {
            let _ = active.handle.cancel().await;
        }
    }

    async fn delete_record(&mut self, id: RecordId) {
        let kind = self
            .state
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.record.kind())
            .unwrap_or(RecordKind::Card);
        match self.client.delete(id).await {
            Ok(()) => {
                let deleted = notice::deleted(kind);
                self.notifications.push(Notification::success(deleted.title));
                self.state.status_message = Some(deleted.body);
            }
            Err(e) => {
                warn!("Delete failed: {}", e);
                self.notifications
                    .push(Notification::error(format!("Failed to delete: {}", e)));
            }
        }
        self.reload_records().await;
    }

    /// Apply a callback from the running reveal session
    pub async fn on_reveal_event(&mut self, event: RevealEvent) {
        let kind = self
            .state
            .revealed
            .as_ref()
            .map(|r| r.record.kind())
            .unwrap_or(RecordKind::Card);
        let policy = self.client.reveal_policy();

        match event {
            RevealEvent::Verified => {
                let verified = notice::verified(kind, policy.disclosure.visibility.as_secs());
                self.notifications.push(Notification::success(verified.title));
                self.state.error_message = None;
                self.state.status_message = Some(verified.body);
            }
            RevealEvent::Rejected { attempts_remaining } => {
                self.state.error_message = Some(rejection_text(attempts_remaining));
            }
            RevealEvent::Lockout { remaining_seconds } => {
                if remaining_seconds == policy.lockout.lockout_secs() {
                    self.state.error_message = None;
                    self.notifications
                        .push(Notification::warning("Too many failed attempts"));
                }
            }
            RevealEvent::Unlocked => {
                self.notifications
                    .push(Notification::info("Unlocked. Enter the PIN again"));
            }
            RevealEvent::DisclosureExpired => {
                let expired = notice::expired(kind);
                self.notifications.push(Notification::info(expired.title));
                self.state.status_message = Some(expired.body);
            }
            RevealEvent::DeleteRequested { record_id } => {
                self.delete_record(record_id).await;
            }
            RevealEvent::Cancelled => {
                self.state.clear_messages();
            }
        }
    }

    /// Follow the session onto the right screen, applying its callbacks first
    ///
    /// The view is read before draining: the driver emits callbacks before it
    /// publishes the view they lead to, so every callback behind this view is
    /// already queued.
    pub async fn sync_reveal(&mut self) {
        let Some(view) = self.reveal.as_ref().map(|active| active.handle.view()) else {
            return;
        };
        self.drain_reveal_events().await;

        self.state.current_screen = match (view.state, self.state.current_screen) {
            (PadState::Closed, _) => {
                self.drain_reveal_events().await;
                self.reveal = None;
                self.state.close_reveal();
                return;
            }
            (PadState::Locked, Screen::ConfirmDelete(ConfirmAction::ForgotPin)) => {
                Screen::ConfirmDelete(ConfirmAction::ForgotPin)
            }
            (PadState::Locked, _) => Screen::Lockout,
            (PadState::Entering, _) => Screen::PinEntry,
            (PadState::Verified, _) => Screen::Details,
        };
        self.state.view = Some(view);
    }

    async fn drain_reveal_events(&mut self) {
        while let Some(event) = self
            .reveal
            .as_mut()
            .and_then(|active| active.events.try_recv().ok())
        {
            self.on_reveal_event(event).await;
        }
    }

    /// Store backing the record list
    pub fn client(&self) -> &StoreClient {
        &self.client
    }
}

async fn next_reveal_event(reveal: &mut Option<ActiveReveal>) -> Option<RevealEvent> {
    match reveal {
        Some(active) => active.events.recv().await,
        None => std::future::pending().await,
    }
}
