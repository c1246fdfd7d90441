//! Backing store configuration.

use serde::{Deserialize, Serialize};

use crate::cache::MokaCacheConfig;

/// In-memory backing store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries held in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

const fn default_max_entries() -> u64 {
    1_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

impl From<CacheConfig> for MokaCacheConfig {
    fn from(config: CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries,
        }
    }
}
