//! Failure simulation configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Controls the admin endpoint that starts simulated failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Whether the admin endpoint is mounted at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path answering `POST` requests that start a failure
    #[serde(default = "default_admin_path")]
    pub admin_path: String,
}

fn default_admin_path() -> String {
    "/disable".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_path: default_admin_path(),
        }
    }
}
