//! HTTP clients that honour the active simulated failure

mod failure_simulating_client;

pub use failure_simulating_client::{
    FailureSimulatingClient, OutboundError, SimulatingClientConfig, SimulatingRequestBuilder,
};
