//! Error types for the Card Vault core library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Card number must be between 13-16 digits")]
    InvalidCardNumber,

    #[error("Expiry date must be in MMYY format")]
    InvalidExpiryFormat,

    #[error("Invalid month: {0}")]
    InvalidExpiryMonth(u32),

    #[error("CVV must be 3-4 digits")]
    InvalidCvv,

    #[error("Invalid owner id: {0}")]
    InvalidOwnerId(String),

    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Failed to decode record data: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
