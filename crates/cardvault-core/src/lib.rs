//! Card Vault Core - Shared record types, PIN handling and display helpers
//!
//! This crate provides the foundational types for the Card Vault: the strict
//! record schema for cards and identity documents, the 4-digit [`Pin`] gate,
//! the reversible blob codec used before storage, and the masking helpers
//! that keep sensitive fields hidden outside a disclosure window.

pub mod codec;
pub mod error;
pub mod format;
pub mod notice;
pub mod record;
pub mod stats;
pub mod types;

pub use codec::{decode_secrets, encode_secrets, SealedRecord};
pub use error::{Result, VaultError};
pub use format::{format_card_number, format_expiry, mask_card_number, SensitiveView};
pub use notice::Notice;
pub use record::{
    CardMeta, CardRecord, CardSecrets, CardType, DocumentMeta, DocumentRecord, DocumentSecrets,
    DocumentType, Issuer, RecordKind, RecordMeta, SecuredRecord,
};
pub use stats::VaultStats;
pub use types::{OwnerId, Pin, RecordId};

/// Number of digits in a gate PIN
pub const PIN_LENGTH: usize = 4;

/// Minimum card number length (digits)
pub const MIN_CARD_NUMBER_LENGTH: usize = 13;

/// Maximum card number length (digits)
pub const MAX_CARD_NUMBER_LENGTH: usize = 16;

/// Months ahead of the reference month that count as "expiring soon"
pub const EXPIRY_WARNING_MONTHS: i32 = 3;
