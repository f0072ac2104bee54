//! Error types for the record store

use cardvault_core::{RecordId, VaultError};
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user is signed in
    #[error("Not signed in")]
    NotAuthenticated,

    /// Record missing or owned by someone else
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// Record failed validation or could not be decoded
    #[error("Invalid record: {0}")]
    Vault(#[from] VaultError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The client was closed
    #[error("Store client is closed")]
    Closed,
}
