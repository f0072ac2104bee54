//! Yes/no dialog before a record is deleted

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{App, ConfirmAction};
use crate::ui::layout::centered_rect;

pub fn draw(frame: &mut Frame, area: Rect, app: &App, action: ConfirmAction) {
    let theme = &app.theme;
    let dialog = centered_rect(60, 40, area);
    frame.render_widget(Clear, dialog);

    let (title, message) = match action {
        ConfirmAction::ForgotPin => (
            " Forgot PIN ",
            "The PIN cannot be recovered. Delete this record permanently?".to_string(),
        ),
        ConfirmAction::DeleteRecord(id) => {
            let name = app
                .state
                .records
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.record.name())
                .unwrap_or("this record");
            (" Delete ", format!("Delete \"{}\" permanently?", name))
        }
    };

    let block = Block::default()
        .title(title)
        .title_style(theme.alert())
        .borders(Borders::ALL)
        .border_style(theme.alert());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(message)
        .style(theme.plain())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let help = Paragraph::new("[y] Delete    [n] Keep")
        .style(theme.hint())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}
