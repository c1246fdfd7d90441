//! Route definitions

use std::sync::Arc;

use application::FailureCreationService;
use axum::{Router, routing::get};

use crate::{handlers, middleware::FailureCreatorLayer, state::AppState};

/// Create the main router with all routes
///
/// When simulation is enabled the admin endpoint is layered over every
/// route, including the fallback, so it answers even without a route.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Active failure
        .route(
            "/failure",
            get(handlers::failure::show_failure).delete(handlers::failure::clear_failure),
        )
        // Attach state
        .with_state(state.clone());

    if !state.config.simulation.enabled {
        return router;
    }

    let creation = Arc::new(FailureCreationService::new(state.registry.clone()));
    router.layer(FailureCreatorLayer::with_admin_path(
        creation,
        &state.config.simulation.admin_path,
    ))
}
