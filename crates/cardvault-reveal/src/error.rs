//! Error types for the reveal driver

use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, RevealError>;

/// Errors from talking to a running reveal session
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RevealError {
    /// The session was torn down and accepts no more commands
    #[error("Reveal session is closed")]
    SessionClosed,
}
