//! Record list with sensitive fields masked

use cardvault_core::{SecuredRecord, SensitiveView};
use cardvault_store::StoredRecord;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

use crate::app::App;
use crate::ui::layout::{render_footer, render_header, render_status, section_block, ScreenLayout};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(area);

    render_header(frame, layout.header, "Records", &app.state.owner, theme);

    let block = section_block("Cards & Documents", theme);
    if app.state.records.is_empty() {
        let empty = Paragraph::new("No records yet")
            .style(theme.hint())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, layout.content);
    } else {
        let items: Vec<ListItem> = app
            .state
            .records
            .iter()
            .enumerate()
            .map(|(i, stored)| {
                ListItem::new(summary(stored)).style(theme.record_row(i == app.state.selected))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), layout.content);
    }

    render_status(
        frame,
        layout.status,
        app.state.status_message.as_deref(),
        app.state.error_message.as_deref(),
        theme,
    );
    render_footer(
        frame,
        layout.footer,
        &[
            ("↑↓", "Select"),
            ("Enter", "Reveal"),
            ("d", "Delete"),
            ("r", "Reload"),
            ("q", "Quit"),
        ],
        theme,
    );
}

fn summary(stored: &StoredRecord) -> String {
    let view = SensitiveView::masked(&stored.record);
    match &stored.record {
        SecuredRecord::Card(card) => format!(
            " {:<9} {:<20} {:<22} {}",
            "card",
            card.meta.card_name,
            view.number(),
            card.meta.issuer
        ),
        SecuredRecord::Document(doc) => format!(
            " {:<9} {:<20} {:<22} {}{}",
            "document",
            doc.meta.document_name,
            view.number(),
            doc.meta.document_type,
            if doc.meta.has_pin { "" } else { " (no PIN)" }
        ),
    }
}
