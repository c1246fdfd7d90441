//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the in-memory
//! backing store, clocks, configuration loading, and the reqwest client
//! that honours the active simulated failure.

pub mod cache;
pub mod clock;
pub mod config;
pub mod http;

pub use cache::{MokaCache, MokaCacheConfig};
pub use clock::{ManualClock, SystemClock};
pub use config::{AppConfig, CacheConfig, ServerConfig, SimulationConfig};
pub use http::{
    FailureSimulatingClient, OutboundError, SimulatingClientConfig, SimulatingRequestBuilder,
};
