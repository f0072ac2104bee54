//! Layout helpers for consistent screen structure

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::Theme;

/// Standard screen layout with header, content, status line and footer
pub struct ScreenLayout {
    pub header: Rect,
    pub content: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(6),    // Content
                Constraint::Length(1), // Status
                Constraint::Length(2), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            content: chunks[1],
            status: chunks[2],
            footer: chunks[3],
        }
    }
}

/// Create a centered box for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render the header bar: product name, breadcrumb, signed-in user
pub fn render_header(frame: &mut Frame, area: Rect, breadcrumb: &str, owner: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.frame(false))
        .style(theme.banner());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(10),
            Constraint::Length(24),
        ])
        .split(inner);

    let logo = Paragraph::new(format!(" {} CARD VAULT", '\u{25C6}')).style(theme.key());
    frame.render_widget(logo, chunks[0]);

    let crumb = Paragraph::new(breadcrumb)
        .style(theme.label())
        .alignment(Alignment::Center);
    frame.render_widget(crumb, chunks[1]);

    let time = chrono::Local::now().format("%H:%M").to_string();
    let user = Paragraph::new(format!("{}  {} ", owner, time))
        .style(theme.hint())
        .alignment(Alignment::Right);
    frame.render_widget(user, chunks[2]);
}

/// Render a footer with key hints
pub fn render_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.frame(false));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(format!("[{}]", key), theme.key()),
                Span::styled(format!(" {}  ", action), theme.hint()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, inner);
}

/// Render the status line; errors win over status text
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    status: Option<&str>,
    error: Option<&str>,
    theme: &Theme,
) {
    let (text, style) = match (error, status) {
        (Some(error), _) => (error, theme.alert()),
        (None, Some(status)) => (status, theme.label()),
        (None, None) => ("", theme.label()),
    };
    let line = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(line, area);
}

/// Create a section block with title
pub fn section_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(theme.key())
        .borders(Borders::ALL)
        .border_style(theme.frame(false))
}
