//! HTTP middleware components
//!
//! This module contains the layer that answers the failure-creation
//! endpoint in front of the application's routes.

pub mod failure_creator;

pub use failure_creator::{DEFAULT_ADMIN_PATH, FailureCreator, FailureCreatorLayer};
