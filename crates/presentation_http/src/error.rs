//! API error handling
//!
//! Errors are rendered as `text/plain` bodies carrying the raw message, so
//! operators see exactly what went wrong when starting a failure.

use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was understood but breaks a rule (422)
    #[error("{0}")]
    Unprocessable(String),

    /// Anything else (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, self.to_string()).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_client_error() {
            Self::Unprocessable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}
