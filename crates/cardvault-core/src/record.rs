//! Secured record schema for cards and identity documents
//!
//! Each record is split into public metadata (stored in the clear, used for
//! listing and statistics) and a secrets part that only ever leaves the
//! store through the reversible blob codec. Validation happens here, at
//! construction and after decoding, never inside the reveal state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};
use crate::types::Pin;
use crate::{MAX_CARD_NUMBER_LENGTH, MIN_CARD_NUMBER_LENGTH};

/// Payment card category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    #[default]
    Credit,
    Debit,
    Prepaid,
    Gift,
    Other,
}

/// Card network / issuer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Issuer {
    Visa,
    Mastercard,
    Rupay,
    Discover,
    Amex,
    Diners,
    Jcb,
    #[default]
    Other,
}

/// Identity document category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    Passport,
    License,
    Voter,
    #[default]
    Other,
}

macro_rules! lowercase_enum {
    ($($ty:ident { $($variant:ident),* $(,)? }),* $(,)?) => {
        $(
            impl $ty {
                pub const ALL: &'static [$ty] = &[$($ty::$variant),*];
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let name = format!("{:?}", self).to_lowercase();
                    f.write_str(&name)
                }
            }

            impl FromStr for $ty {
                type Err = VaultError;

                fn from_str(s: &str) -> Result<Self> {
                    let wanted = s.trim();
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|v| v.to_string().eq_ignore_ascii_case(wanted))
                        .ok_or_else(|| VaultError::UnknownCategory(s.to_string()))
                }
            }
        )*
    };
}

lowercase_enum!(
    CardType { Credit, Debit, Prepaid, Gift, Other },
    Issuer { Visa, Mastercard, Rupay, Discover, Amex, Diners, Jcb, Other },
    DocumentType { Aadhaar, Pan, Passport, License, Voter, Other },
);

/// Public card metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    pub card_name: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub card_holder_name: Option<String>,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default)]
    pub issuer: Issuer,
}

/// Sensitive card fields
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct CardSecrets {
    /// Digits only, 13-16 long
    pub card_number: String,
    /// MMYY
    pub expiry: String,
    /// Empty when the card has no CVV on file
    #[serde(default)]
    pub cvv: String,
    /// Gate PIN for revealing this card
    pub pin: Pin,
    #[serde(default)]
    pub atm_pin: Option<Pin>,
}

impl fmt::Debug for CardSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardSecrets").finish_non_exhaustive()
    }
}

/// Public document metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub document_name: String,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub issuing_authority: Option<String>,
    /// Whether the document is PIN-gated; mirrors `secrets.pin.is_some()`
    #[serde(default)]
    pub has_pin: bool,
}

/// Sensitive document fields
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct DocumentSecrets {
    pub document_number: String,
    #[serde(default)]
    pub pin: Option<Pin>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl fmt::Debug for DocumentSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSecrets").finish_non_exhaustive()
    }
}

/// A stored payment card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub meta: CardMeta,
    pub secrets: CardSecrets,
}

impl CardRecord {
    /// Build a card, validating every field
    pub fn new(meta: CardMeta, secrets: CardSecrets) -> Result<Self> {
        let record = Self { meta, secrets };
        record.validate()?;
        Ok(record)
    }

    /// Check the card against the schema rules
    pub fn validate(&self) -> Result<()> {
        if self.meta.card_name.trim().is_empty() {
            return Err(VaultError::MissingField("Card name"));
        }

        let number = &self.secrets.card_number;
        if number.len() < MIN_CARD_NUMBER_LENGTH
            || number.len() > MAX_CARD_NUMBER_LENGTH
            || !number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(VaultError::InvalidCardNumber);
        }

        validate_expiry(&self.secrets.expiry)?;

        let cvv = &self.secrets.cvv;
        if !cvv.is_empty()
            && (cvv.len() < 3 || cvv.len() > 4 || !cvv.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(VaultError::InvalidCvv);
        }

        Ok(())
    }

    /// Last four digits of the card number
    pub fn last_four(&self) -> &str {
        let number = &self.secrets.card_number;
        &number[number.len().saturating_sub(4)..]
    }

    /// Holder name, falling back to the card name like the original form did
    pub fn holder_name(&self) -> &str {
        self.meta
            .card_holder_name
            .as_deref()
            .unwrap_or(&self.meta.card_name)
    }
}

/// Parse an `MMYY` expiry into `(month, two-digit year)`
pub fn parse_expiry(expiry: &str) -> Result<(u32, u32)> {
    if expiry.len() != 4 || !expiry.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VaultError::InvalidExpiryFormat);
    }
    let month: u32 = expiry[..2]
        .parse()
        .map_err(|_| VaultError::InvalidExpiryFormat)?;
    let year: u32 = expiry[2..]
        .parse()
        .map_err(|_| VaultError::InvalidExpiryFormat)?;
    if !(1..=12).contains(&month) {
        return Err(VaultError::InvalidExpiryMonth(month));
    }
    Ok((month, year))
}

fn validate_expiry(expiry: &str) -> Result<()> {
    parse_expiry(expiry).map(|_| ())
}

/// A stored identity document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub meta: DocumentMeta,
    pub secrets: DocumentSecrets,
}

impl DocumentRecord {
    /// Build a document, validating every field and syncing `has_pin`
    pub fn new(mut meta: DocumentMeta, secrets: DocumentSecrets) -> Result<Self> {
        meta.has_pin = secrets.pin.is_some();
        let record = Self { meta, secrets };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if self.meta.document_name.trim().is_empty() {
            return Err(VaultError::MissingField("Document name"));
        }
        if self.secrets.document_number.trim().is_empty() {
            return Err(VaultError::MissingField("Document number"));
        }
        Ok(())
    }
}

/// Discriminant for [`SecuredRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Card,
    Document,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Card => "card",
            RecordKind::Document => "document",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public metadata of either record kind, stored in the clear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordMeta {
    Card(CardMeta),
    Document(DocumentMeta),
}

impl RecordMeta {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordMeta::Card(_) => RecordKind::Card,
            RecordMeta::Document(_) => RecordKind::Document,
        }
    }

    /// Display name of the record
    pub fn name(&self) -> &str {
        match self {
            RecordMeta::Card(meta) => &meta.card_name,
            RecordMeta::Document(meta) => &meta.document_name,
        }
    }
}

/// A card or document holding sensitive fields behind a PIN gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecuredRecord {
    Card(CardRecord),
    Document(DocumentRecord),
}

impl SecuredRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            SecuredRecord::Card(_) => RecordKind::Card,
            SecuredRecord::Document(_) => RecordKind::Document,
        }
    }

    /// Display name of the record
    pub fn name(&self) -> &str {
        match self {
            SecuredRecord::Card(card) => &card.meta.card_name,
            SecuredRecord::Document(doc) => &doc.meta.document_name,
        }
    }

    /// The PIN guarding a reveal, if the record is gated.
    ///
    /// Cards are always gated; documents only when stored with a PIN.
    pub fn gate_pin(&self) -> Option<&Pin> {
        match self {
            SecuredRecord::Card(card) => Some(&card.secrets.pin),
            SecuredRecord::Document(doc) => doc.secrets.pin.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SecuredRecord::Card(card) => card.validate(),
            SecuredRecord::Document(doc) => doc.validate(),
        }
    }

    pub fn as_card(&self) -> Option<&CardRecord> {
        match self {
            SecuredRecord::Card(card) => Some(card),
            SecuredRecord::Document(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentRecord> {
        match self {
            SecuredRecord::Document(doc) => Some(doc),
            SecuredRecord::Card(_) => None,
        }
    }
}

impl From<CardRecord> for SecuredRecord {
    fn from(card: CardRecord) -> Self {
        SecuredRecord::Card(card)
    }
}

impl From<DocumentRecord> for SecuredRecord {
    fn from(doc: DocumentRecord) -> Self {
        SecuredRecord::Document(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_meta() -> CardMeta {
        CardMeta {
            card_name: "Travel Visa".to_string(),
            bank_name: Some("First Bank".to_string()),
            card_holder_name: None,
            card_type: CardType::Credit,
            issuer: Issuer::Visa,
        }
    }

    fn card_secrets(number: &str, expiry: &str, cvv: &str) -> CardSecrets {
        CardSecrets {
            card_number: number.to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
            pin: Pin::new("4321").unwrap(),
            atm_pin: None,
        }
    }

    #[test]
    fn test_valid_card() {
        let card = CardRecord::new(card_meta(), card_secrets("4111111111111111", "1229", "123"))
            .unwrap();
        assert_eq!(card.last_four(), "1111");
        assert_eq!(card.holder_name(), "Travel Visa");
    }

    #[test]
    fn test_card_number_rules() {
        let short = CardRecord::new(card_meta(), card_secrets("411111111111", "1229", "123"));
        assert!(matches!(short, Err(VaultError::InvalidCardNumber)));

        let long = CardRecord::new(card_meta(), card_secrets("41111111111111112", "1229", "123"));
        assert!(matches!(long, Err(VaultError::InvalidCardNumber)));

        let letters = CardRecord::new(card_meta(), card_secrets("4111a11111111111", "1229", ""));
        assert!(matches!(letters, Err(VaultError::InvalidCardNumber)));
    }

    #[test]
    fn test_expiry_rules() {
        assert_eq!(parse_expiry("0127").unwrap(), (1, 27));
        assert!(matches!(
            parse_expiry("1327"),
            Err(VaultError::InvalidExpiryMonth(13))
        ));
        assert!(matches!(
            parse_expiry("0027"),
            Err(VaultError::InvalidExpiryMonth(0))
        ));
        assert!(matches!(
            parse_expiry("12/27"),
            Err(VaultError::InvalidExpiryFormat)
        ));
    }

    #[test]
    fn test_cvv_optional_but_checked() {
        assert!(CardRecord::new(card_meta(), card_secrets("4111111111111", "0130", "")).is_ok());
        assert!(CardRecord::new(card_meta(), card_secrets("4111111111111", "0130", "1234")).is_ok());
        assert!(matches!(
            CardRecord::new(card_meta(), card_secrets("4111111111111", "0130", "12")),
            Err(VaultError::InvalidCvv)
        ));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Debit".parse::<CardType>().unwrap(), CardType::Debit);
        assert_eq!(" rupay ".parse::<Issuer>().unwrap(), Issuer::Rupay);
        assert_eq!("passport".parse::<DocumentType>().unwrap(), DocumentType::Passport);
        assert!(matches!(
            "platinum".parse::<CardType>(),
            Err(VaultError::UnknownCategory(_))
        ));
        assert_eq!(Issuer::ALL.len(), 8);
    }

    #[test]
    fn test_missing_card_name() {
        let mut meta = card_meta();
        meta.card_name = "   ".to_string();
        assert!(matches!(
            CardRecord::new(meta, card_secrets("4111111111111111", "1229", "123")),
            Err(VaultError::MissingField("Card name"))
        ));
    }

    #[test]
    fn test_document_gate_follows_pin() {
        let meta = DocumentMeta {
            document_name: "Passport".to_string(),
            document_type: DocumentType::Passport,
            holder_name: None,
            issue_date: None,
            expiry_date: None,
            issuing_authority: None,
            has_pin: true,
        };
        let ungated = DocumentRecord::new(
            meta.clone(),
            DocumentSecrets {
                document_number: "P1234567".to_string(),
                pin: None,
                additional_info: None,
            },
        )
        .unwrap();
        assert!(!ungated.meta.has_pin);
        assert!(SecuredRecord::from(ungated).gate_pin().is_none());

        let gated = DocumentRecord::new(
            meta,
            DocumentSecrets {
                document_number: "P1234567".to_string(),
                pin: Some(Pin::new("0000").unwrap()),
                additional_info: Some("renew in 2030".to_string()),
            },
        )
        .unwrap();
        assert!(gated.meta.has_pin);
        assert!(SecuredRecord::from(gated).gate_pin().is_some());
    }

    #[test]
    fn test_secrets_debug_hides_values() {
        let secrets = card_secrets("4111111111111111", "1229", "123");
        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("123"));
    }

    #[test]
    fn test_enum_display() {
        assert_eq!(CardType::Prepaid.to_string(), "prepaid");
        assert_eq!(Issuer::Mastercard.to_string(), "mastercard");
        assert_eq!(DocumentType::Aadhaar.to_string(), "aadhaar");
    }
}
