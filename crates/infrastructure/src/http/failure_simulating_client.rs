//! HTTP client that consults the active failure before every call
//!
//! Wraps `reqwest::Client`. Calls whose URL matches the active failure never
//! reach the network: they get a synthetic response or a simulated fault.
//!
//! # Examples
//!
//! ```ignore
//! use infrastructure::http::FailureSimulatingClient;
//!
//! let client = FailureSimulatingClient::new(dispatcher)?;
//! let response = client
//!     .get("https://api.example.com/data")
//!     .send()
//!     .await?;
//! ```

use std::time::Duration;

use application::{ApplicationError, FailureDispatcher, Verdict};
use domain::{SimulatedFault, SyntheticResponse};
use reqwest::{
    Client, Method, Request, RequestBuilder, Response,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors returned by [`FailureSimulatingClient`]
#[derive(Debug, Error)]
pub enum OutboundError {
    /// The active failure replaced this call with a fault
    #[error(transparent)]
    Simulated(#[from] SimulatedFault),

    /// The real call failed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The active failure could not be looked up
    #[error(transparent)]
    Dispatch(#[from] ApplicationError),

    /// The stored failure describes a response HTTP cannot carry
    #[error("invalid synthetic response: {0}")]
    InvalidSyntheticResponse(#[from] http::Error),
}

impl OutboundError {
    /// Whether the error was fabricated rather than observed
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }

    /// Whether the error represents a timeout, real or simulated
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Simulated(fault) => fault.is_timeout(),
            Self::Transport(err) => err.is_timeout(),
            Self::Dispatch(_) | Self::InvalidSyntheticResponse(_) => false,
        }
    }
}

/// Configuration for the simulating HTTP client
#[derive(Debug, Clone)]
pub struct SimulatingClientConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Default headers to include in all requests
    pub default_headers: HeaderMap,
}

impl Default for SimulatingClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: format!("faultline/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HeaderMap::new(),
        }
    }
}

impl SimulatingClientConfig {
    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header to all requests
    #[must_use]
    pub fn with_header(
        mut self,
        name: impl TryInto<HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.default_headers.insert(name, value);
        }
        self
    }
}

/// HTTP client that simulates the active failure
///
/// Cloning is cheap; clones share the connection pool and the registry.
#[derive(Debug, Clone)]
pub struct FailureSimulatingClient {
    inner: Client,
    dispatcher: FailureDispatcher,
}

impl FailureSimulatingClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(dispatcher: FailureDispatcher) -> Result<Self, reqwest::Error> {
        Self::with_config(dispatcher, &SimulatingClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn with_config(
        dispatcher: FailureDispatcher,
        config: &SimulatingClientConfig,
    ) -> Result<Self, reqwest::Error> {
        let inner = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(config.default_headers.clone())
            .build()?;

        Ok(Self::from_client(inner, dispatcher))
    }

    /// Wrap an existing reqwest client
    pub const fn from_client(inner: Client, dispatcher: FailureDispatcher) -> Self {
        Self { inner, dispatcher }
    }

    /// Start a GET request
    pub fn get(&self, url: impl AsRef<str>) -> SimulatingRequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&self, url: impl AsRef<str>) -> SimulatingRequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start a request with a specific method
    pub fn request(&self, method: Method, url: impl AsRef<str>) -> SimulatingRequestBuilder {
        SimulatingRequestBuilder {
            inner: self.inner.request(method, url.as_ref()),
            client: self.clone(),
        }
    }

    /// Execute a built request, simulating the active failure if it matches
    ///
    /// # Errors
    ///
    /// Returns [`OutboundError::Simulated`] for timeout and TLS failures,
    /// otherwise whatever the lookup or the real call produced.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<Response, OutboundError> {
        match self.dispatcher.evaluate(request.url()).await? {
            Verdict::PassThrough => {
                debug!("No matching failure, sending request");
                Ok(self.inner.execute(request).await?)
            },
            Verdict::Simulate(outcome) => Ok(synthetic_response(outcome.into_result()?)?),
        }
    }
}

fn synthetic_response(synthetic: SyntheticResponse) -> Result<Response, http::Error> {
    let mut builder = http::Response::builder().status(synthetic.status);
    for (name, value) in &synthetic.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    Ok(Response::from(builder.body(synthetic.body)?))
}

/// Request builder whose `send` goes through the failure check
pub struct SimulatingRequestBuilder {
    inner: RequestBuilder,
    client: FailureSimulatingClient,
}

impl std::fmt::Debug for SimulatingRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatingRequestBuilder")
            .finish_non_exhaustive()
    }
}

impl SimulatingRequestBuilder {
    /// Add a header to the request
    #[must_use]
    pub fn header(
        mut self,
        name: impl TryInto<HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.inner = self.inner.header(name, value);
        }
        self
    }

    /// Set the request body as JSON
    #[must_use]
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.inner = self.inner.json(json);
        self
    }

    /// Set a query string
    #[must_use]
    pub fn query<T: serde::Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.inner = self.inner.query(query);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Send the request
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, the failure lookup
    /// fails, the call is simulated as a fault, or the real call fails.
    pub async fn send(self) -> Result<Response, OutboundError> {
        let request = self.inner.build()?;
        self.client.execute(request).await
    }
}
