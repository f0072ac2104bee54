//! Colors for the vault screens
//!
//! Styles are named after what they mark on screen: masked versus revealed
//! values, the PIN slots, the locked pad and toast levels.

use ratatui::style::{Color, Modifier, Style};

use crate::ui::components::notification::NotificationLevel;

pub struct Theme {
    /// Logo, headings and focused frames
    pub brand: Color,
    /// Header strip behind the logo
    pub surface: Color,
    pub edge: Color,
    pub ink: Color,
    pub ink_dim: Color,
    pub ink_faint: Color,
    /// Background of the selected record row
    pub cursor: Color,
    /// Plaintext secrets inside the disclosure window
    pub revealed: Color,
    /// Lockout frame and wrong-PIN messages
    pub locked: Color,
    pub caution: Color,
    pub ok: Color,
    pub note: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand: Color::Rgb(38, 166, 154),   // teal
            surface: Color::Rgb(24, 28, 32),
            edge: Color::Rgb(60, 68, 76),
            ink: Color::Rgb(236, 239, 241),
            ink_dim: Color::Rgb(176, 190, 197),
            ink_faint: Color::Rgb(110, 122, 130),
            cursor: Color::Rgb(38, 50, 56),
            revealed: Color::Rgb(255, 213, 79), // amber
            locked: Color::Rgb(229, 57, 53),
            caution: Color::Rgb(251, 140, 0),
            ok: Color::Rgb(67, 160, 71),
            note: Color::Rgb(66, 165, 245),
        }
    }
}

impl Theme {
    pub fn plain(&self) -> Style {
        Style::default().fg(self.ink)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.ink_dim)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.ink_faint)
    }

    /// Key names in footers and dialog titles
    pub fn key(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn frame(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.brand } else { self.edge })
    }

    /// Header strip
    pub fn banner(&self) -> Style {
        Style::default().bg(self.surface)
    }

    pub fn alert(&self) -> Style {
        Style::default().fg(self.locked).add_modifier(Modifier::BOLD)
    }

    pub fn caution(&self) -> Style {
        Style::default().fg(self.caution)
    }

    pub fn toast(&self, level: NotificationLevel) -> Style {
        match level {
            NotificationLevel::Info => Style::default().fg(self.note),
            NotificationLevel::Success => Style::default().fg(self.ok),
            NotificationLevel::Warning => self.caution(),
            NotificationLevel::Error => self.alert(),
        }
    }

    pub fn record_row(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.cursor)
                .fg(self.brand)
                .add_modifier(Modifier::BOLD)
        } else {
            self.plain()
        }
    }

    /// Record field value; plaintext stands out from its masked form
    pub fn field_value(&self, visible: bool) -> Style {
        if visible {
            Style::default().fg(self.revealed)
        } else {
            self.hint()
        }
    }

    /// One of the four PIN slots
    pub fn pin_slot(&self, filled: bool) -> Style {
        if filled {
            self.key()
        } else {
            self.hint()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revealed_values_stand_out_from_masked() {
        let theme = Theme::default();
        assert_eq!(theme.field_value(true).fg, Some(theme.revealed));
        assert_eq!(theme.field_value(false), theme.hint());
        assert_ne!(theme.pin_slot(true), theme.pin_slot(false));
    }
}
