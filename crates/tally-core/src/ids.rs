//! Identifier types used across the aggregation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer identifier as issued by the surrounding platform.
///
/// The aggregation layer treats it as opaque; validation is the caller's
/// responsibility. A blank id is legal but disables caching downstream.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    /// Create a new customer ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
