//! Value Objects - Immutable, identity-less domain primitives

mod dependency_pattern;
mod failure_mode;
mod lifespan;
mod simulated_outcome;

pub use dependency_pattern::DependencyPattern;
pub use failure_mode::FailureMode;
pub use lifespan::Lifespan;
pub use simulated_outcome::{
    SIMULATED_FAULT_MESSAGE, SimulatedFault, SimulatedOutcome, SyntheticResponse,
};
