//! Failure mode value object

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// How a matching outbound call should fail
///
/// Parsing is case-insensitive; the canonical form is lowercase
/// (`500`, `timeout`, `ssl_error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FailureMode {
    /// Answer with a synthetic response carrying this status code
    Status(u16),
    /// Fail as if the network call timed out
    Timeout,
    /// Fail as if the TLS handshake was rejected
    SslError,
}

impl FailureMode {
    /// Lowest status code a synthetic response may carry
    pub const MIN_STATUS: u16 = 100;
    /// Highest status code a synthetic response may carry
    pub const MAX_STATUS: u16 = 599;

    /// Create a status-code mode, checking the code is a valid HTTP status
    pub fn status(code: u16) -> Result<Self, DomainError> {
        if (Self::MIN_STATUS..=Self::MAX_STATUS).contains(&code) {
            Ok(Self::Status(code))
        } else {
            Err(DomainError::InvalidFailureMode(code.to_string()))
        }
    }

    /// Parse a mode requested by an operator
    ///
    /// Only error statuses are accepted here: `4xx`, `5xx`, `timeout` or
    /// `ssl_error`, in any letter case.
    pub fn parse_requested(raw: &str) -> Result<Self, DomainError> {
        let lowered = raw.to_ascii_lowercase();
        match lowered.as_str() {
            "timeout" => Ok(Self::Timeout),
            "ssl_error" => Ok(Self::SslError),
            code if is_error_status(code) => code
                .parse()
                .map(Self::Status)
                .map_err(|_| DomainError::InvalidFailureMode(raw.to_string())),
            _ => Err(DomainError::InvalidFailureMode(raw.to_string())),
        }
    }

    /// Status code for response modes
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Timeout | Self::SslError => None,
        }
    }

    /// Whether this mode produces a response rather than a transport fault
    #[must_use]
    pub const fn is_response(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

/// `(4|5)\d\d`
fn is_error_status(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 3 && matches!(bytes[0], b'4' | b'5') && bytes[1..].iter().all(u8::is_ascii_digit)
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{code}"),
            Self::Timeout => write!(f, "timeout"),
            Self::SslError => write!(f, "ssl_error"),
        }
    }
}

impl FromStr for FailureMode {
    type Err = DomainError;

    /// Parse any stored mode, including non-error statuses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "timeout" => Ok(Self::Timeout),
            "ssl_error" => Ok(Self::SslError),
            other => other
                .parse::<u16>()
                .map_err(|_| DomainError::InvalidFailureMode(s.to_string()))
                .and_then(Self::status),
        }
    }
}

impl TryFrom<String> for FailureMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FailureMode> for String {
    fn from(mode: FailureMode) -> Self {
        mode.to_string()
    }
}
