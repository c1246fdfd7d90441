//! Clock port definition

use chrono::{DateTime, Utc};

/// Source of the current instant
///
/// Injected so expiration can be exercised without waiting.
pub trait ClockPort: Send + Sync + std::fmt::Debug {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;
}
