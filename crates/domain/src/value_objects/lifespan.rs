//! Lifespan value object - how long a simulated failure stays active

use std::{fmt, time::Duration};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A whole number of minutes between [`Lifespan::MIN_MINUTES`] and
/// [`Lifespan::MAX_MINUTES`], inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Lifespan {
    minutes: u32,
}

impl Lifespan {
    /// Shortest allowed lifespan
    pub const MIN_MINUTES: u32 = 1;
    /// Longest allowed lifespan
    pub const MAX_MINUTES: u32 = 60;
    /// Lifespan used when the operator gives none
    pub const DEFAULT: Self = Self { minutes: 5 };

    /// Create a lifespan from a number of minutes
    pub fn from_minutes(minutes: u32) -> Result<Self, DomainError> {
        if (Self::MIN_MINUTES..=Self::MAX_MINUTES).contains(&minutes) {
            Ok(Self { minutes })
        } else {
            Err(DomainError::InvalidLifespan(minutes.to_string()))
        }
    }

    /// Parse a base-10 integer number of minutes
    ///
    /// Fractions, signs other than a bare number, and surrounding
    /// whitespace are rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidLifespan(raw.to_string()));
        }
        raw.parse::<u32>()
            .map_err(|_| DomainError::InvalidLifespan(raw.to_string()))
            .and_then(Self::from_minutes)
            .map_err(|_| DomainError::InvalidLifespan(raw.to_string()))
    }

    /// Number of minutes
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// As a std duration, for TTL-based stores
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.minutes as u64 * 60)
    }

    /// As a chrono delta, for computing expiration instants
    #[must_use]
    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }
}

impl Default for Lifespan {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Lifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes)
    }
}

impl TryFrom<u32> for Lifespan {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(value)
    }
}

impl From<Lifespan> for u32 {
    fn from(lifespan: Lifespan) -> Self {
        lifespan.minutes
    }
}
