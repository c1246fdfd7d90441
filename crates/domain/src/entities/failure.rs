//! Failure entity - one simulated outage of an outbound dependency

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::DomainError,
    value_objects::{DependencyPattern, FailureMode, SimulatedOutcome, SyntheticResponse},
};

/// JSON object used as a synthetic response body
pub type ResponseBody = Map<String, Value>;

/// Header name to value
pub type ResponseHeaders = BTreeMap<String, String>;

/// An active simulated failure
///
/// Every field is fixed at construction except `expires_at`, which the
/// registry sets once when the failure is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pattern: DependencyPattern,
    mode: FailureMode,
    #[serde(default)]
    response_body: ResponseBody,
    #[serde(default)]
    response_headers: ResponseHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl Failure {
    /// Create a failure with an empty body and no headers
    pub fn new(pattern: DependencyPattern, mode: FailureMode) -> Self {
        Self {
            pattern,
            mode,
            response_body: ResponseBody::new(),
            response_headers: ResponseHeaders::new(),
            expires_at: None,
        }
    }

    /// Set the body served for status-code modes
    #[must_use]
    pub fn with_response_body(mut self, body: ResponseBody) -> Self {
        self.response_body = body;
        self
    }

    /// Set the headers served for status-code modes
    #[must_use]
    pub fn with_response_headers(mut self, headers: ResponseHeaders) -> Self {
        self.response_headers = headers;
        self
    }

    /// Stamp the expiration instant
    #[must_use]
    pub const fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub const fn pattern(&self) -> &DependencyPattern {
        &self.pattern
    }

    pub const fn mode(&self) -> FailureMode {
        self.mode
    }

    pub const fn response_body(&self) -> &ResponseBody {
        &self.response_body
    }

    pub const fn response_headers(&self) -> &ResponseHeaders {
        &self.response_headers
    }

    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the failure has run out at `now`
    ///
    /// A failure that was never stored has no expiry and is not expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Whether a call to `request_url` should be failed
    pub fn should_fail(&self, request_url: &str) -> bool {
        self.pattern.is_found_in(request_url)
    }

    /// Produce the simulated outcome for a matching call
    pub fn respond(&self) -> SimulatedOutcome {
        match self.mode {
            FailureMode::Timeout => SimulatedOutcome::Timeout,
            FailureMode::SslError => SimulatedOutcome::SslError,
            FailureMode::Status(status) => SimulatedOutcome::Response(SyntheticResponse {
                status,
                body: Value::Object(self.response_body.clone()).to_string(),
                headers: self.response_headers.clone(),
            }),
        }
    }

    /// Parse a JSON object to use as response body
    pub fn body_from_json(raw: &str) -> Result<ResponseBody, DomainError> {
        json_object(raw)
    }

    /// Parse a JSON object to use as response headers
    ///
    /// String values are taken as-is; any other value is rendered as JSON.
    /// Every pair must be a valid HTTP header.
    pub fn headers_from_json(raw: &str) -> Result<ResponseHeaders, DomainError> {
        json_object(raw)?
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
                HeaderValue::from_str(&value)
                    .map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
                Ok((name, value))
            })
            .collect()
    }
}

fn json_object(raw: &str) -> Result<Map<String, Value>, DomainError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DomainError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(DomainError::InvalidPayload(e.to_string())),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a pattern source as a `/.../` literal, escaping bare slashes
fn regex_literal(source: &str) -> String {
    let mut literal = String::with_capacity(source.len() + 2);
    literal.push('/');
    let mut escaped = false;
    for c in source.chars() {
        if c == '/' && !escaped {
            literal.push('\\');
        }
        escaped = c == '\\' && !escaped;
        literal.push(c);
    }
    literal.push('/');
    literal
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failure on {} ending at approximately ",
            regex_literal(self.pattern.as_str())
        )?;
        match self.expires_at {
            Some(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "an unknown time"),
        }
    }
}
