//! Display formatting and masking for sensitive fields

use crate::record::SecuredRecord;

/// Placeholder for a hidden card number group
pub const MASK_GROUP: &str = "••••";

/// Placeholder for a hidden expiry
pub const MASKED_EXPIRY: &str = "••/••";

/// Placeholder for a hidden CVV
pub const MASKED_CVV: &str = "•••";

/// Group card number digits in blocks of four, ignoring non-digits
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render an `MMYY` expiry as `MM/YY`, ignoring non-digits
pub fn format_expiry(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).take(4).collect();
    if digits.len() <= 2 {
        digits
    } else {
        format!("{}/{}", &digits[..2], &digits[2..])
    }
}

/// Mask all but the last four digits: `•••• •••• •••• 1234`
pub fn mask_card_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let last_four = &digits[digits.len().saturating_sub(4)..];
    format!("{0} {0} {0} {1}", MASK_GROUP, last_four)
}

/// Renders a record's sensitive fields, masked unless the disclosure window
/// is open.
///
/// Hosts build this from the reveal read model's `visible` flag so plaintext
/// is never produced outside an active, non-expired reveal.
pub struct SensitiveView<'a> {
    record: &'a SecuredRecord,
    visible: bool,
}

impl<'a> SensitiveView<'a> {
    pub fn new(record: &'a SecuredRecord, visible: bool) -> Self {
        Self { record, visible }
    }

    /// View that always masks
    pub fn masked(record: &'a SecuredRecord) -> Self {
        Self::new(record, false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Card number, or the document number for documents
    pub fn number(&self) -> String {
        match self.record {
            SecuredRecord::Card(card) if self.visible => {
                format_card_number(&card.secrets.card_number)
            }
            SecuredRecord::Card(card) => mask_card_number(&card.secrets.card_number),
            SecuredRecord::Document(doc) if self.visible => doc.secrets.document_number.clone(),
            SecuredRecord::Document(doc) => mask_tail(&doc.secrets.document_number),
        }
    }

    pub fn expiry(&self) -> Option<String> {
        match self.record {
            SecuredRecord::Card(card) if self.visible => Some(format_expiry(&card.secrets.expiry)),
            SecuredRecord::Card(_) => Some(MASKED_EXPIRY.to_string()),
            SecuredRecord::Document(doc) => doc.meta.expiry_date.clone(),
        }
    }

    /// CVV, `None` when the card has none on file or for documents
    pub fn cvv(&self) -> Option<String> {
        let card = self.record.as_card()?;
        if card.secrets.cvv.is_empty() {
            return None;
        }
        Some(if self.visible {
            card.secrets.cvv.clone()
        } else {
            MASKED_CVV.to_string()
        })
    }

    pub fn atm_pin(&self) -> Option<String> {
        let card = self.record.as_card()?;
        let atm_pin = card.secrets.atm_pin.as_ref()?;
        Some(if self.visible {
            atm_pin.expose().to_string()
        } else {
            MASK_GROUP.to_string()
        })
    }

    /// The gate PIN itself ("Security PIN")
    pub fn security_pin(&self) -> Option<String> {
        let pin = self.record.gate_pin()?;
        Some(if self.visible {
            pin.expose().to_string()
        } else {
            MASK_GROUP.to_string()
        })
    }

    /// Free-text notes on documents
    pub fn notes(&self) -> Option<String> {
        let doc = self.record.as_document()?;
        let info = doc.secrets.additional_info.as_ref()?;
        Some(if self.visible {
            info.clone()
        } else {
            "••••••".to_string()
        })
    }
}

fn mask_tail(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let keep = chars.len().min(4).min(chars.len() / 2);
    let hidden = chars.len() - keep;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "•".repeat(hidden), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        CardMeta, CardRecord, CardSecrets, DocumentMeta, DocumentRecord, DocumentSecrets,
    };
    use crate::types::Pin;

    fn card() -> SecuredRecord {
        SecuredRecord::Card(
            CardRecord::new(
                CardMeta {
                    card_name: "Main".to_string(),
                    bank_name: None,
                    card_holder_name: None,
                    card_type: Default::default(),
                    issuer: Default::default(),
                },
                CardSecrets {
                    card_number: "4111111111111234".to_string(),
                    expiry: "0729".to_string(),
                    cvv: "987".to_string(),
                    pin: Pin::new("4321").unwrap(),
                    atm_pin: Some(Pin::new("5555").unwrap()),
                },
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111111111111234"), "4111 1111 1111 1234");
        assert_eq!(format_card_number("4111 11"), "4111 11");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("0729"), "07/29");
        assert_eq!(format_expiry("07"), "07");
        assert_eq!(format_expiry("07/29"), "07/29");
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4111111111111234"), "•••• •••• •••• 1234");
    }

    #[test]
    fn test_masked_view_leaks_nothing() {
        let record = card();
        let view = SensitiveView::masked(&record);
        assert_eq!(view.number(), "•••• •••• •••• 1234");
        assert_eq!(view.expiry().unwrap(), MASKED_EXPIRY);
        assert_eq!(view.cvv().unwrap(), MASKED_CVV);
        assert_eq!(view.atm_pin().unwrap(), MASK_GROUP);
        assert_eq!(view.security_pin().unwrap(), MASK_GROUP);
    }

    #[test]
    fn test_visible_view() {
        let record = card();
        let view = SensitiveView::new(&record, true);
        assert_eq!(view.number(), "4111 1111 1111 1234");
        assert_eq!(view.expiry().unwrap(), "07/29");
        assert_eq!(view.cvv().unwrap(), "987");
        assert_eq!(view.atm_pin().unwrap(), "5555");
        assert_eq!(view.security_pin().unwrap(), "4321");
        assert!(view.notes().is_none());
    }

    #[test]
    fn test_document_view() {
        let record = SecuredRecord::Document(
            DocumentRecord::new(
                DocumentMeta {
                    document_name: "PAN".to_string(),
                    document_type: Default::default(),
                    holder_name: None,
                    issue_date: None,
                    expiry_date: Some("2031-01-01".to_string()),
                    issuing_authority: None,
                    has_pin: false,
                },
                DocumentSecrets {
                    document_number: "ABCDE1234F".to_string(),
                    pin: None,
                    additional_info: Some("linked to bank".to_string()),
                },
            )
            .unwrap(),
        );

        let masked = SensitiveView::masked(&record);
        assert_eq!(masked.number(), "••••••234F");
        assert_eq!(masked.notes().unwrap(), "••••••");
        assert!(masked.security_pin().is_none());

        let visible = SensitiveView::new(&record, true);
        assert_eq!(visible.number(), "ABCDE1234F");
        assert_eq!(visible.notes().unwrap(), "linked to bank");
        assert_eq!(visible.expiry().unwrap(), "2031-01-01");
    }
}
