//! Faultline HTTP presentation layer
//!
//! This crate provides the admin endpoint that starts simulated failures,
//! read-only status handlers, and the server binary.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use middleware::{FailureCreator, FailureCreatorLayer};
pub use routes::create_router;
pub use state::AppState;
