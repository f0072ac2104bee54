//! Core identifier newtypes and the gate PIN

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::VaultError;
use crate::PIN_LENGTH;

/// Record ID - random UUID assigned when a record is first stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh random record ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short display format (first 8 hex characters)
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| VaultError::InvalidRecordId(s.to_string()))
    }
}

/// Owner ID - the authenticated user a record belongs to
///
/// Owner IDs double as directory names in the file store, so only
/// `[A-Za-z0-9._@-]` is accepted and a leading dot is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Maximum owner ID length
    pub const MAX_LENGTH: usize = 64;

    /// Validate and wrap an owner ID
    pub fn new(id: impl Into<String>) -> Result<Self, VaultError> {
        let id = id.into();
        let valid_chars = id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-'));

        if id.is_empty() || id.len() > Self::MAX_LENGTH || id.starts_with('.') || !valid_chars {
            return Err(VaultError::InvalidOwnerId(id));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl FromStr for OwnerId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Gate PIN - exactly four ASCII digits
///
/// The PIN is a convenience lock, not a cryptographic secret: it is compared
/// as a plain string and stored inside the same reversible blob as the other
/// sensitive fields. The value is zeroized on drop and never printed by
/// `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    /// Validate and wrap a PIN
    pub fn new(pin: impl Into<String>) -> Result<Self, VaultError> {
        let pin = pin.into();
        if !is_pin_shaped(&pin) {
            return Err(VaultError::InvalidPin);
        }
        Ok(Self(pin))
    }

    /// Compare an entered digit string against this PIN.
    ///
    /// Exact string equality with no normalization.
    pub fn matches(&self, entered: &str) -> bool {
        self.0 == entered
    }

    /// Expose the PIN digits for rendering inside an open disclosure window
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Whether `s` has the shape of a gate PIN
pub fn is_pin_shaped(s: &str) -> bool {
    s.len() == PIN_LENGTH && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl TryFrom<String> for Pin {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0.clone()
    }
}

impl FromStr for Pin {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_validation() {
        assert!(Pin::new("4321").is_ok());
        assert!(Pin::new("0000").is_ok());

        // Too short / too long
        assert!(Pin::new("123").is_err());
        assert!(Pin::new("12345").is_err());

        // Non-digits
        assert!(Pin::new("12a4").is_err());
        assert!(Pin::new(" 123").is_err());
        assert!(Pin::new("١٢٣٤").is_err());
    }

    #[test]
    fn test_pin_matches_exactly() {
        let pin = Pin::new("4321").unwrap();
        assert!(pin.matches("4321"));
        assert!(!pin.matches("1234"));
        assert!(!pin.matches("4321 "));
        assert!(!pin.matches(""));
    }

    #[test]
    fn test_pin_debug_is_redacted() {
        let pin = Pin::new("4321").unwrap();
        assert_eq!(format!("{:?}", pin), "Pin(****)");
    }

    #[test]
    fn test_pin_serde_rejects_bad_value() {
        let ok: Pin = serde_json::from_str("\"9876\"").unwrap();
        assert!(ok.matches("9876"));
        assert!(serde_json::from_str::<Pin>("\"98\"").is_err());
    }

    #[test]
    fn test_owner_id_validation() {
        assert!(OwnerId::new("alice@example.com").is_ok());
        assert!(OwnerId::new("user_01-a").is_ok());

        assert!(OwnerId::new("").is_err());
        assert!(OwnerId::new("../etc").is_err());
        assert!(OwnerId::new(".hidden").is_err());
        assert!(OwnerId::new("a/b").is_err());
        assert!(OwnerId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_record_id_parse() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.short().len(), 8);
        assert!("not-a-uuid".parse::<RecordId>().is_err());
    }
}
