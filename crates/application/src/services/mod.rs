//! Application services - Use case implementations

mod failure_creation;
mod failure_dispatcher;
mod failure_registry;

pub use failure_creation::{
    CreationRequest, FailureCreationService, PARAM_DEPENDENCY, PARAM_FAILURE, PARAM_HEADERS,
    PARAM_MINUTES, PARAM_RESPONSE,
};
pub use failure_dispatcher::{FailureDispatcher, OutboundRequest, Verdict};
pub use failure_registry::{CURRENT_FAILURE_KEY, FailureRegistry};
