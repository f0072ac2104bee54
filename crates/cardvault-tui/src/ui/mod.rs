//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};

/// Main render function - delegates to the current screen, then draws toasts
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.state.current_screen {
        Screen::Records => screens::records::draw(frame, area, app),
        Screen::PinEntry => screens::pin_entry::draw(frame, area, app),
        Screen::Lockout => screens::lockout::draw(frame, area, app),
        Screen::Details => screens::details::draw(frame, area, app),
        Screen::ConfirmDelete(action) => {
            // The dialog sits on top of the screen it was opened from
            match action {
                crate::app::ConfirmAction::ForgotPin => screens::lockout::draw(frame, area, app),
                crate::app::ConfirmAction::DeleteRecord(_) => {
                    screens::records::draw(frame, area, app)
                }
            }
            screens::confirm::draw(frame, area, app, action);
        }
    }
    app.notifications.render(frame, area, &app.theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_store::{StoreClient, StoreConfig};
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_record_list_renders() {
        let app = App::new(StoreClient::in_memory(StoreConfig::default()));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("CARD VAULT"));
        assert!(text.contains("No records yet"));
    }
}
