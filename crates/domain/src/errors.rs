//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Dependency pattern is not a valid regular expression
    #[error("{0}")]
    InvalidPattern(String),

    /// Failure mode is not a 4xx/5xx status, `timeout`, or `ssl_error`
    #[error("Invalid failure mode: {0}")]
    InvalidFailureMode(String),

    /// Lifespan is not an integer number of minutes in range
    #[error("Invalid lifespan: {0}")]
    InvalidLifespan(String),

    /// Response body or headers are not a JSON object
    #[error("{0}")]
    InvalidPayload(String),
}

impl DomainError {
    /// Whether the message carries a raw parser error that must be shown verbatim
    #[must_use]
    pub const fn is_syntactic(&self) -> bool {
        matches!(self, Self::InvalidPattern(_) | Self::InvalidPayload(_))
    }
}
