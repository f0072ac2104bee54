//! User-facing notification texts shared by every host

use crate::record::RecordKind;

/// A title and body pair shown as a toast or status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub body: String,
}

fn subject(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Card => "Card",
        RecordKind::Document => "Document",
    }
}

fn whole_minutes(secs: u64) -> String {
    match secs {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

/// Shown when the PIN matched
pub fn verified(kind: RecordKind, visible_secs: u64) -> Notice {
    Notice {
        title: "PIN Verified",
        body: format!(
            "{} details will be visible for {}.",
            subject(kind),
            whole_minutes(visible_secs)
        ),
    }
}

/// Shown when the disclosure window closes
pub fn expired(kind: RecordKind) -> Notice {
    Notice {
        title: "Session Expired",
        body: format!(
            "{} details have been hidden for security.",
            subject(kind)
        ),
    }
}

/// Shown after a record was removed
pub fn deleted(kind: RecordKind) -> Notice {
    let title = match kind {
        RecordKind::Card => "Card Deleted",
        RecordKind::Document => "Document Deleted",
    };
    Notice {
        title,
        body: format!(
            "Your {} has been permanently removed.",
            subject(kind).to_lowercase()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_texts() {
        let notice = verified(RecordKind::Card, 60);
        assert_eq!(notice.title, "PIN Verified");
        assert_eq!(notice.body, "Card details will be visible for 1 minute.");
        assert_eq!(
            expired(RecordKind::Card).body,
            "Card details have been hidden for security."
        );
        assert_eq!(
            deleted(RecordKind::Card).body,
            "Your card has been permanently removed."
        );
    }

    #[test]
    fn test_durations() {
        assert!(verified(RecordKind::Document, 120).body.ends_with("2 minutes."));
        assert!(verified(RecordKind::Document, 45).body.ends_with("45 seconds."));
    }
}
