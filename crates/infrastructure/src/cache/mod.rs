//! Cache implementations
//!
//! Backing stores for the failure registry:
//! - `MokaCache`: in-memory cache with a TTL per entry

mod moka_cache;

pub use moka_cache::{MokaCache, MokaCacheConfig};
