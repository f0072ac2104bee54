//! Lockout screen shown after too many wrong PINs

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::app::App;
use crate::ui::layout::{centered_rect, render_header, ScreenLayout};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(area);
    render_header(frame, layout.header, "Locked", &app.state.owner, theme);

    let dialog = centered_rect(50, 60, area);
    let block = Block::default()
        .title(" Locked ")
        .title_style(theme.alert())
        .borders(Borders::ALL)
        .border_style(theme.alert());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Warning icon
            Constraint::Length(3), // Message
            Constraint::Length(2), // Countdown
            Constraint::Length(1), // Progress
            Constraint::Min(0),    // Spacer
            Constraint::Length(2), // Help
        ])
        .split(inner);

    let icon = Paragraph::new("⚠  LOCKED  ⚠")
        .style(theme.alert())
        .alignment(Alignment::Center);
    frame.render_widget(icon, chunks[0]);

    let message = app
        .state
        .view
        .as_ref()
        .and_then(|v| v.message.clone())
        .unwrap_or_else(|| "Too many failed attempts.".to_string());
    let message_widget = Paragraph::new(format!("{}\nPlease wait before trying again.", message))
        .style(theme.plain())
        .alignment(Alignment::Center);
    frame.render_widget(message_widget, chunks[1]);

    let remaining = app
        .state
        .view
        .as_ref()
        .map(|v| v.lock_remaining_seconds)
        .unwrap_or(0);
    let countdown = Paragraph::new(format!("Try again in {} seconds", remaining))
        .style(theme.caution())
        .alignment(Alignment::Center);
    frame.render_widget(countdown, chunks[2]);

    let total = app.client().reveal_policy().lockout.lockout_secs().max(1);
    let elapsed = total.saturating_sub(remaining) as f64 / total as f64;
    let gauge = Gauge::default()
        .gauge_style(theme.alert())
        .ratio(elapsed.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, chunks[3]);

    let help = Paragraph::new("[f] Forgot PIN (deletes this record)    [Esc] Close")
        .style(theme.hint())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}
