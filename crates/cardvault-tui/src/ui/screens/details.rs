//! Record details, plaintext only while the disclosure window is open

use cardvault_core::{SecuredRecord, SensitiveView};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::layout::{render_footer, render_header, render_status, section_block, ScreenLayout};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(area);
    render_header(frame, layout.header, "Details", &app.state.owner, theme);

    let Some(stored) = &app.state.revealed else {
        return;
    };
    let view = SensitiveView::new(&stored.record, app.state.details_visible());

    let mut lines: Vec<(&str, String)> = Vec::new();
    match &stored.record {
        SecuredRecord::Card(card) => {
            lines.push(("Holder", card.holder_name().to_string()));
            if let Some(bank) = &card.meta.bank_name {
                lines.push(("Bank", bank.clone()));
            }
            lines.push((
                "Type",
                format!("{} / {}", card.meta.card_type, card.meta.issuer),
            ));
            lines.push(("Number", view.number()));
            if let Some(expiry) = view.expiry() {
                lines.push(("Expiry", expiry));
            }
            if let Some(cvv) = view.cvv() {
                lines.push(("CVV", cvv));
            }
            if let Some(atm_pin) = view.atm_pin() {
                lines.push(("ATM PIN", atm_pin));
            }
        }
        SecuredRecord::Document(doc) => {
            lines.push(("Type", doc.meta.document_type.to_string()));
            if let Some(holder) = &doc.meta.holder_name {
                lines.push(("Holder", holder.clone()));
            }
            lines.push(("Number", view.number()));
            if let Some(issued) = &doc.meta.issue_date {
                lines.push(("Issued", issued.clone()));
            }
            if let Some(expiry) = view.expiry() {
                lines.push(("Expires", expiry));
            }
            if let Some(authority) = &doc.meta.issuing_authority {
                lines.push(("Authority", authority.clone()));
            }
            if let Some(notes) = view.notes() {
                lines.push(("Notes", notes));
            }
        }
    }
    if let Some(pin) = view.security_pin() {
        lines.push(("Security PIN", pin));
    }

    let value_style = theme.field_value(view.is_visible());
    let text: Vec<Line> = lines
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!(" {:<14}", label), theme.label()),
                Span::styled(value, value_style),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(text).block(section_block(stored.record.name(), theme)),
        layout.content,
    );

    let countdown = app
        .state
        .view
        .as_ref()
        .filter(|v| v.visible)
        .map(|v| format!("Hidden again in {}s", v.visible_remaining_seconds));
    render_status(
        frame,
        layout.status,
        countdown.as_deref().or(app.state.status_message.as_deref()),
        app.state.error_message.as_deref(),
        theme,
    );

    let hints: &[(&str, &str)] = if app.state.view.is_some() {
        &[("p", "PIN pad"), ("Esc", "Hide & close")]
    } else {
        &[("Esc", "Close")]
    };
    render_footer(frame, layout.footer, hints, theme);
}
