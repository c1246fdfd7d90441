//! What a matching outbound call turns into

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by simulated transport faults
pub const SIMULATED_FAULT_MESSAGE: &str = "Fake failure from faultline";

/// A response fabricated instead of calling the real dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticResponse {
    /// HTTP status code
    pub status: u16,
    /// Serialized JSON body
    pub body: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
}

/// A transport-level fault standing in for a real network error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimulatedFault {
    /// The call timed out
    #[error("timeout: {SIMULATED_FAULT_MESSAGE}")]
    Timeout,
    /// The TLS handshake failed
    #[error("ssl error: {SIMULATED_FAULT_MESSAGE}")]
    Ssl,
}

impl SimulatedFault {
    /// Whether this fault mimics a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Result of asking an active failure to respond
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    /// Answer with this response
    Response(SyntheticResponse),
    /// Raise a timeout
    Timeout,
    /// Raise a TLS failure
    SslError,
}

impl SimulatedOutcome {
    /// Split into a response or a fault to propagate
    pub fn into_result(self) -> Result<SyntheticResponse, SimulatedFault> {
        match self {
            Self::Response(response) => Ok(response),
            Self::Timeout => Err(SimulatedFault::Timeout),
            Self::SslError => Err(SimulatedFault::Ssl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_become_errors() {
        assert_eq!(
            SimulatedOutcome::Timeout.into_result(),
            Err(SimulatedFault::Timeout)
        );
        assert_eq!(
            SimulatedOutcome::SslError.into_result(),
            Err(SimulatedFault::Ssl)
        );
    }

    #[test]
    fn response_passes_through() {
        let response = SyntheticResponse {
            status: 503,
            body: "{}".to_string(),
            headers: BTreeMap::new(),
        };
        assert_eq!(
            SimulatedOutcome::Response(response.clone()).into_result(),
            Ok(response)
        );
    }

    #[test]
    fn fault_messages_name_the_source() {
        assert!(SimulatedFault::Timeout.to_string().starts_with("timeout"));
        assert!(
            SimulatedFault::Ssl
                .to_string()
                .contains(SIMULATED_FAULT_MESSAGE)
        );
        assert!(SimulatedFault::Timeout.is_timeout());
        assert!(!SimulatedFault::Ssl.is_timeout());
    }
}
