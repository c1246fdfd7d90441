//! Failure Dispatcher - decides, per outbound call, whether to fake a failure

use std::borrow::Cow;

use domain::SimulatedOutcome;
use tracing::{instrument, warn};

use crate::{error::ApplicationError, services::FailureRegistry};

/// Anything exposing the URL an outbound call targets
pub trait OutboundRequest {
    /// Full target URL, as matched against the failure pattern
    fn target_url(&self) -> Cow<'_, str>;
}

impl OutboundRequest for str {
    fn target_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl OutboundRequest for String {
    fn target_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl OutboundRequest for url::Url {
    fn target_url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// What the caller should do with an outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Perform the real call
    PassThrough,
    /// Replace the call with this outcome
    Simulate(SimulatedOutcome),
}

impl Verdict {
    /// Whether the real call should go ahead
    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }
}

/// Evaluates outbound calls against the active failure
///
/// Each evaluation performs exactly one registry read.
#[derive(Debug, Clone)]
pub struct FailureDispatcher {
    registry: FailureRegistry,
}

impl FailureDispatcher {
    /// Create a new dispatcher
    pub const fn new(registry: FailureRegistry) -> Self {
        Self { registry }
    }

    /// Decide what to do with `request`
    #[instrument(skip_all, level = "debug")]
    pub async fn evaluate<R>(&self, request: &R) -> Result<Verdict, ApplicationError>
    where
        R: OutboundRequest + ?Sized + Sync,
    {
        let Some(failure) = self.registry.current().await? else {
            return Ok(Verdict::PassThrough);
        };

        let url = request.target_url();
        if !failure.should_fail(&url) {
            return Ok(Verdict::PassThrough);
        }

        warn!(url = %url, failure = %failure, "Simulating a failed call");
        Ok(Verdict::Simulate(failure.respond()))
    }
}

#[cfg(test)]
mod tests {
    use domain::{DependencyPattern, Failure, FailureMode, Lifespan};

    use super::*;
    use crate::services::failure_registry::tests::registry;

    async fn dispatcher_with(mode: FailureMode) -> FailureDispatcher {
        let (registry, _) = registry();
        registry
            .create(
                Failure::new(DependencyPattern::new("yahoo|google").unwrap(), mode)
                    .with_response_body(Failure::body_from_json(r#"{"hello":"there"}"#).unwrap())
                    .with_response_headers(
                        Failure::headers_from_json(r#"{"Content-type":"application/json"}"#)
                            .unwrap(),
                    ),
                Lifespan::from_minutes(60).unwrap(),
            )
            .await
            .unwrap();
        FailureDispatcher::new(registry)
    }

    #[tokio::test]
    async fn empty_registry_passes_through() {
        let (registry, _) = registry();
        let dispatcher = FailureDispatcher::new(registry);

        for url in ["https://www.google.com/", "", "anything at all"] {
            assert_eq!(dispatcher.evaluate(url).await.unwrap(), Verdict::PassThrough);
        }
    }

    #[tokio::test]
    async fn non_matching_url_passes_through() {
        let dispatcher = dispatcher_with(FailureMode::Status(415)).await;
        let verdict = dispatcher
            .evaluate("https://www.bing.com/search?q=adorable+kittens&go=&qs=n&form=QBLH&pq=adorable+kittens")
            .await
            .unwrap();
        assert!(verdict.is_pass_through());
    }

    #[tokio::test]
    async fn matching_url_gets_synthetic_response() {
        let dispatcher = dispatcher_with(FailureMode::Status(415)).await;
        let verdict = dispatcher
            .evaluate(&"https://www.google.com/search?q=adorable+kittens".to_string())
            .await
            .unwrap();

        let Verdict::Simulate(SimulatedOutcome::Response(response)) = verdict else {
            unreachable!("expected a synthetic response, got {verdict:?}");
        };
        assert_eq!(response.status, 415);
        assert_eq!(response.body, r#"{"hello":"there"}"#);
        assert_eq!(
            response.headers.get("Content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn timeout_mode_yields_timeout() {
        let dispatcher = dispatcher_with(FailureMode::Timeout).await;
        let url = url::Url::parse("https://search.yahoo.com/search?p=puppies").unwrap();
        assert_eq!(
            dispatcher.evaluate(&url).await.unwrap(),
            Verdict::Simulate(SimulatedOutcome::Timeout)
        );
    }

    #[tokio::test]
    async fn ssl_mode_yields_ssl_error() {
        let dispatcher = dispatcher_with(FailureMode::SslError).await;
        assert_eq!(
            dispatcher
                .evaluate("https://www.google.com/search?q=adorable+puppies")
                .await
                .unwrap(),
            Verdict::Simulate(SimulatedOutcome::SslError)
        );
    }
}
