//! Error types for listgate.

use thiserror::Error;

/// Common error type for listgate.
///
/// Request-level rejections (bad email, missing fields, banned address) are
/// not errors; they travel as [`crate::Outcome`] values. This type covers
/// lookups that abort an operation and failures of the collaborators.
#[derive(Error, Debug)]
pub enum ListGateError {
    /// Mailing-list engine failure.
    ///
    /// Storage errors from any engine backend end up here. Errors from sqlx
    /// are converted automatically.
    #[error("engine error: {0}")]
    Engine(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Admin credential could not be hashed.
    #[error("credential error: {0}")]
    Credential(String),

    /// The named list does not exist.
    #[error("unknown list: {0}")]
    UnknownList(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ListGateError {
    fn from(e: sqlx::Error) -> Self {
        ListGateError::Engine(e.to_string())
    }
}

/// Result type alias for listgate operations.
pub type Result<T> = std::result::Result<T, ListGateError>;
