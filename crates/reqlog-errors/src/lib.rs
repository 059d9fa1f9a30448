//! Error facility for reqlog
//!
//! Logging itself never fails a caller's operation, so these errors only
//! surface from configuration loading and from handler writes (where the
//! logger swallows them and reports to the diagnostics channel).

use thiserror::Error;

/// Result type alias using ReqlogError
pub type Result<T> = std::result::Result<T, ReqlogError>;

#[derive(Debug, Error)]
pub enum ReqlogError {
    #[error("invalid log level: {0:?} (expected debug, info, warn or error)")]
    InvalidLevel(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ReqlogError {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            ReqlogError::InvalidLevel(_) => "ERR_INVALID_LEVEL",
            ReqlogError::Config(_) => "ERR_CONFIG",
            ReqlogError::Io(_) => "ERR_IO",
            ReqlogError::Encode(_) => "ERR_ENCODE",
        }
    }
}
