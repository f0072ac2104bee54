//! Toast notification component

use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::TICK_RATE;
use crate::ui::Theme;

/// Notification severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Toast notification
#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Remaining ticks until dismissal
    pub ttl: u64,
}

impl Notification {
    /// Create a notification shown for `duration`
    pub fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        let ttl = (duration.as_millis() / TICK_RATE.as_millis().max(1)) as u64;
        Self {
            message: message.into(),
            level,
            ttl: ttl.max(1),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info, Duration::from_secs(3))
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success, Duration::from_secs(3))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning, Duration::from_secs(5))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error, Duration::from_secs(6))
    }

    pub fn is_expired(&self) -> bool {
        self.ttl == 0
    }

    pub fn tick(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
    }

    pub fn icon(&self) -> &'static str {
        match self.level {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }

    /// Render the toast at the top-right of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let style = theme.toast(self.level);

        let width = ((self.message.chars().count() + 6).min(60) as u16).min(area.width);
        let height = 3.min(area.height);
        let x = area.x + area.width.saturating_sub(width + 2);
        let y = area.y + 1.min(area.height.saturating_sub(height));
        let toast_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, toast_area);

        let block = Block::default().borders(Borders::ALL).border_style(style);
        let content = Paragraph::new(format!("{} {}", self.icon(), self.message))
            .style(style)
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(content, toast_area);
    }
}

/// Stack of active toasts, newest last
#[derive(Debug)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    max_visible: usize,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
            max_visible: 3,
        }
    }

    /// Add a notification, dropping the oldest past the limit
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
        while self.notifications.len() > self.max_visible {
            self.notifications.remove(0);
        }
    }

    /// Tick all notifications and remove expired
    pub fn tick(&mut self) {
        for n in &mut self.notifications {
            n.tick();
        }
        self.notifications.retain(|n| !n.is_expired());
    }

    #[cfg(test)]
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.notifications.iter().map(|n| n.message.as_str())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        for (i, notification) in self.notifications.iter().enumerate() {
            let offset_y = (i * 4) as u16;
            if offset_y >= area.height {
                break;
            }
            let adjusted_area = Rect::new(
                area.x,
                area.y + offset_y,
                area.width,
                area.height - offset_y,
            );
            notification.render(frame, adjusted_area, theme);
        }
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::info(Notification::info("Unlocked"), 30)]
    #[case::success(Notification::success("PIN Verified"), 30)]
    #[case::warning(Notification::warning("Too many failed attempts"), 50)]
    #[case::error(Notification::error("Failed to delete"), 60)]
    fn test_ttl_per_level(#[case] toast: Notification, #[case] ticks: u64) {
        assert_eq!(toast.ttl, ticks);
    }

    #[test]
    fn test_toast_expires_after_its_duration() {
        let mut toast = Notification::success("PIN Verified");
        assert_eq!(toast.ttl, 30);
        for _ in 0..29 {
            toast.tick();
        }
        assert!(!toast.is_expired());
        toast.tick();
        assert!(toast.is_expired());
    }

    #[test]
    fn test_manager_keeps_newest() {
        let mut manager = NotificationManager::new();
        for message in ["PIN Verified", "Session Expired", "Card Deleted", "Unlocked"] {
            manager.push(Notification::info(message));
        }
        let messages: Vec<_> = manager.messages().collect();
        assert_eq!(messages, vec!["Session Expired", "Card Deleted", "Unlocked"]);
    }

    #[test]
    fn test_manager_drops_expired() {
        let mut manager = NotificationManager::new();
        manager.push(Notification::new(
            "Card Deleted",
            NotificationLevel::Success,
            TICK_RATE,
        ));
        manager.tick();
        assert_eq!(manager.messages().count(), 0);
    }
}
