//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Operator input broke a creation rule; the message is shown verbatim
    #[error("{0}")]
    Validation(String),

    /// A simulated failure is already active
    #[error("A failure is already in progress ({failure}).")]
    AlreadyActive {
        /// Description of the active failure
        failure: String,
    },

    /// Backing store error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Anything else; the underlying message is passed through untouched
    #[error("{0}")]
    Unexpected(String),
}

impl ApplicationError {
    /// Whether the caller is at fault and should fix the request
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AlreadyActive { .. })
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        if err.is_syntactic() {
            Self::Unexpected(err.to_string())
        } else {
            Self::Validation(err.to_string())
        }
    }
}
