//! PIN pad for a record's 4-digit gate PIN

use cardvault_core::PIN_LENGTH;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::layout::{centered_rect, render_header, ScreenLayout};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(area);
    let name = app
        .state
        .revealed
        .as_ref()
        .map(|r| r.record.name())
        .unwrap_or_default();

    render_header(frame, layout.header, "Enter PIN", &app.state.owner, theme);

    let dialog = centered_rect(50, 60, area);
    let block = Block::default()
        .title(" PIN Required ")
        .title_style(theme.key())
        .borders(Borders::ALL)
        .border_style(theme.frame(true));

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Record name
            Constraint::Length(2), // Instructions
            Constraint::Length(2), // PIN display
            Constraint::Length(2), // Error message
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let title = Paragraph::new(name)
        .style(theme.key())
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let instructions = Paragraph::new("Enter the 4-digit PIN to reveal details")
        .style(theme.label())
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[1]);

    let view = app.state.view.as_ref();
    let entered = view.map(|v| v.entered_digit_count).unwrap_or(0);
    let mut dots: Vec<Span> = Vec::with_capacity(PIN_LENGTH * 2);
    for i in 0..PIN_LENGTH {
        let filled = i < entered;
        dots.push(Span::styled(
            if filled { "●" } else { "○" },
            theme.pin_slot(filled),
        ));
        dots.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(dots)).alignment(Alignment::Center),
        chunks[2],
    );

    let error = app
        .state
        .error_message
        .as_deref()
        .or(app.state.status_message.as_deref());
    if let Some(error) = error {
        let error_widget = Paragraph::new(error)
            .style(theme.alert())
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, chunks[3]);
    }

    let help = if view.map(|v| v.can_submit).unwrap_or(false) {
        "[Enter] Verify    [Esc] Close"
    } else {
        "[0-9] Digit  [Backspace] Erase  [Del] Clear  [Esc] Close"
    };
    let help_widget = Paragraph::new(help)
        .style(theme.hint())
        .alignment(Alignment::Center);
    frame.render_widget(help_widget, chunks[5]);

    // Remaining window when the pad was reopened from the details view
    if let Some(view) = view.filter(|v| v.visible) {
        let note = format!("Details stay unlocked for {}s", view.visible_remaining_seconds);
        let y = dialog.y + dialog.height;
        if y < area.y + area.height {
            frame.render_widget(
                Paragraph::new(note)
                    .style(theme.hint())
                    .alignment(Alignment::Center),
                Rect::new(area.x, y, area.width, 1),
            );
        }
    }
}
