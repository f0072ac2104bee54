//! Application state management

use cardvault_core::RecordId;
use cardvault_reveal::RevealView;
use cardvault_store::StoredRecord;

/// Available screens in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Masked list of the user's records
    Records,
    /// 4-digit PIN pad
    PinEntry,
    /// Lockout countdown with the forgot-PIN option
    Lockout,
    /// Record fields, plaintext while the disclosure window is open
    Details,
    /// Yes/no prompt before a record is deleted
    ConfirmDelete(ConfirmAction),
}

/// What a confirmation prompt is guarding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Forgot PIN from the lockout screen
    ForgotPin,
    /// Plain delete from the record list
    DeleteRecord(RecordId),
}

/// Application state
pub struct AppState {
    /// Current screen
    pub current_screen: Screen,

    /// Records of the signed-in user, newest first
    pub records: Vec<StoredRecord>,

    /// Selected row in the record list
    pub selected: usize,

    /// Record opened for reveal
    pub revealed: Option<StoredRecord>,

    /// Latest read model of the running reveal session
    pub view: Option<RevealView>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Error message to display
    pub error_message: Option<String>,

    /// Signed-in user, for the header
    pub owner: String,
}

impl AppState {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            current_screen: Screen::Records,
            records: Vec::new(),
            selected: 0,
            revealed: None,
            view: None,
            status_message: None,
            error_message: None,
            owner: owner.into(),
        }
    }

    pub fn selected_record(&self) -> Option<&StoredRecord> {
        self.records.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    /// Replace the record list, keeping the selection in range
    pub fn set_records(&mut self, records: Vec<StoredRecord>) {
        self.records = records;
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
    }

    /// Whether the revealed record's fields may be shown in plaintext
    pub fn details_visible(&self) -> bool {
        match &self.view {
            Some(view) => view.visible,
            // Records without a gate PIN are shown directly
            None => self.revealed.is_some(),
        }
    }

    /// Clear status and error messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }

    /// Forget the revealed record and go back to the list
    pub fn close_reveal(&mut self) {
        self.revealed = None;
        self.view = None;
        self.current_screen = Screen::Records;
    }
}
