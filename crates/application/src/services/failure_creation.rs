//! Failure creation - turns untrusted operator parameters into an active failure

use std::collections::HashMap;

use domain::{
    DependencyPattern, Failure, FailureMode, Lifespan, ResponseBody, ResponseHeaders,
};
use tracing::{info, instrument};

use crate::{error::ApplicationError, services::FailureRegistry};

/// Query parameter naming the dependency pattern
pub const PARAM_DEPENDENCY: &str = "dependency";
/// Query parameter for the lifespan in minutes
pub const PARAM_MINUTES: &str = "minutes";
/// Query parameter for the failure mode
pub const PARAM_FAILURE: &str = "failure";
/// Query parameter for the percent-encoded JSON response body
pub const PARAM_RESPONSE: &str = "response";
/// Query parameter for the percent-encoded JSON response headers
pub const PARAM_HEADERS: &str = "headers";

const DEFAULT_FAILURE: &str = "500";
const EMPTY_OBJECT: &str = "{}";

/// A validated request to start simulating a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRequest {
    /// Raw dependency as given, echoed in the confirmation
    pub dependency: String,
    /// Compiled dependency pattern
    pub pattern: DependencyPattern,
    /// Raw minutes as given, echoed in the confirmation
    pub minutes: String,
    /// How long the failure stays active
    pub lifespan: Lifespan,
    /// How matching calls fail
    pub mode: FailureMode,
    /// Body for status-code modes
    pub response_body: ResponseBody,
    /// Headers for status-code modes
    pub response_headers: ResponseHeaders,
}

impl CreationRequest {
    /// Validate raw parameters
    ///
    /// Checks run in this order: dependency presence, body and headers
    /// syntax, failure mode, minutes. Malformed body/header JSON or an
    /// invalid dependency regex surface as [`ApplicationError::Unexpected`]
    /// carrying the parser message; rule violations are
    /// [`ApplicationError::Validation`].
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ApplicationError> {
        let dependency = params
            .get(PARAM_DEPENDENCY)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                ApplicationError::Validation(
                    "Please provide a dependency to simulate failing".to_string(),
                )
            })?;

        let response_body = Failure::body_from_json(&percent_decode(param_or(
            params,
            PARAM_RESPONSE,
            EMPTY_OBJECT,
        ))?)?;
        let response_headers = Failure::headers_from_json(&percent_decode(param_or(
            params,
            PARAM_HEADERS,
            EMPTY_OBJECT,
        ))?)?;

        let raw_failure = param_or(params, PARAM_FAILURE, DEFAULT_FAILURE);
        let mode = FailureMode::parse_requested(raw_failure).map_err(|_| {
            ApplicationError::Validation(format!(
                "failure should be a 4xx or 5xx status code, timeout, or ssl_error; got {raw_failure}"
            ))
        })?;

        let (minutes, lifespan) = match params.get(PARAM_MINUTES) {
            Some(raw_minutes) => {
                let lifespan = Lifespan::parse(raw_minutes).map_err(|_| {
                    ApplicationError::Validation(format!(
                        "minutes should be an integer from {} to {}, got {raw_minutes}",
                        Lifespan::MIN_MINUTES,
                        Lifespan::MAX_MINUTES
                    ))
                })?;
                (raw_minutes.clone(), lifespan)
            },
            None => {
                let lifespan = Lifespan::default();
                (lifespan.to_string(), lifespan)
            },
        };

        let pattern = DependencyPattern::new(dependency)?;

        Ok(Self {
            dependency: dependency.clone(),
            pattern,
            minutes,
            lifespan,
            mode,
            response_body,
            response_headers,
        })
    }

    /// Build the failure this request describes
    pub fn to_failure(&self) -> Failure {
        Failure::new(self.pattern.clone(), self.mode)
            .with_response_body(self.response_body.clone())
            .with_response_headers(self.response_headers.clone())
    }

    /// Text confirming what will happen
    pub fn confirmation(&self) -> String {
        format!(
            "For the next {} minutes, all requests to urls containing '{}' will {}",
            self.minutes, self.dependency, self.mode
        )
    }
}

fn param_or<'a>(params: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    params.get(key).map_or(default, String::as_str)
}

/// Percent-decode form-style, treating `+` as a space
fn percent_decode(raw: &str) -> Result<String, ApplicationError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ApplicationError::Unexpected(e.to_string()))
}

/// Validates creation parameters and stores the resulting failure
#[derive(Debug, Clone)]
pub struct FailureCreationService {
    registry: FailureRegistry,
}

impl FailureCreationService {
    /// Create a new creation service
    pub const fn new(registry: FailureRegistry) -> Self {
        Self { registry }
    }

    /// Validate `params`, store the failure, and return the confirmation text
    #[instrument(skip(self, params), fields(dependency = ?params.get(PARAM_DEPENDENCY)))]
    pub async fn create_failure(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<String, ApplicationError> {
        let request = CreationRequest::parse(params)?;
        self.registry
            .create(request.to_failure(), request.lifespan)
            .await?;

        let confirmation = request.confirmation();
        info!("{confirmation}");
        Ok(confirmation)
    }
}
