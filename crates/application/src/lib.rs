//! Application layer - Use cases and orchestration
//!
//! Contains the failure registry, creation and dispatch services, and the
//! port definitions infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
