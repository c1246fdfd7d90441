//! Dependency pattern value object

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A regular expression searched for inside outbound request URLs
///
/// Matching is a contains-match: the expression may hit anywhere in the
/// URL, it is never anchored to the start or end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyPattern {
    regex: Regex,
}

impl DependencyPattern {
    /// Compile a pattern
    ///
    /// Empty patterns are rejected since they would match every request.
    pub fn new(source: impl AsRef<str>) -> Result<Self, DomainError> {
        let source = source.as_ref();
        if source.is_empty() {
            return Err(DomainError::InvalidPattern(
                "dependency pattern must not be empty".to_string(),
            ));
        }
        Regex::new(source)
            .map(|regex| Self { regex })
            .map_err(|e| DomainError::InvalidPattern(e.to_string()))
    }

    /// The pattern source as given at creation
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern occurs anywhere in `haystack`
    pub fn is_found_in(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for DependencyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for DependencyPattern {}

impl fmt::Display for DependencyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DependencyPattern {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DependencyPattern {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DependencyPattern> for String {
    fn from(pattern: DependencyPattern) -> Self {
        pattern.as_str().to_string()
    }
}
