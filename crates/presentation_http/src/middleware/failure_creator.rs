//! Admin endpoint that starts a simulated failure
//!
//! Wraps any axum service. `POST` requests on the admin path are answered
//! here; everything else reaches the inner service untouched.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::FailureCreationService;
use axum::{
    extract::{Query, Request},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ApiError;

/// Default path of the admin endpoint
pub const DEFAULT_ADMIN_PATH: &str = "/disable";

/// Layer that mounts the failure-creation endpoint in front of a service
#[derive(Debug, Clone)]
pub struct FailureCreatorLayer {
    service: Arc<FailureCreationService>,
    admin_path: Arc<str>,
}

impl FailureCreatorLayer {
    /// Answer on [`DEFAULT_ADMIN_PATH`]
    #[must_use]
    pub fn new(service: Arc<FailureCreationService>) -> Self {
        Self::with_admin_path(service, DEFAULT_ADMIN_PATH)
    }

    /// Answer on a custom path
    #[must_use]
    pub fn with_admin_path(service: Arc<FailureCreationService>, admin_path: &str) -> Self {
        Self {
            service,
            admin_path: Arc::from(admin_path),
        }
    }
}

impl<S> Layer<S> for FailureCreatorLayer {
    type Service = FailureCreator<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FailureCreator {
            inner,
            service: Arc::clone(&self.service),
            admin_path: Arc::clone(&self.admin_path),
        }
    }
}

/// Middleware service answering the admin endpoint
#[derive(Debug, Clone)]
pub struct FailureCreator<S> {
    inner: S,
    service: Arc<FailureCreationService>,
    admin_path: Arc<str>,
}

impl<S> FailureCreator<S> {
    fn is_admin_request(&self, req: &Request) -> bool {
        req.method() == Method::POST && req.uri().path() == &*self.admin_path
    }
}

impl<S> Service<Request> for FailureCreator<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if !self.is_admin_request(&req) {
            let future = self.inner.call(req);
            return Box::pin(future);
        }

        debug!(uri = %req.uri(), "Failure creation requested");
        let params = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(params)| params)
            .map_err(|rejection| ApiError::Internal(rejection.body_text()));
        let service = Arc::clone(&self.service);

        Box::pin(async move { Ok(create_failure(&service, params).await) })
    }
}

async fn create_failure(
    service: &FailureCreationService,
    params: Result<HashMap<String, String>, ApiError>,
) -> Response {
    let params = match params {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };

    match service.create_failure(&params).await {
        Ok(confirmation) => (StatusCode::CREATED, confirmation).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
