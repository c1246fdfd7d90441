//! Application state shared across handlers

use std::sync::Arc;

use application::FailureRegistry;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry holding the active failure
    pub registry: FailureRegistry,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
