//! Cache layer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the read cache in front of the aggregation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Absolute expiry, seconds from write.
    pub absolute_ttl_seconds: u64,
    /// Sliding expiry, seconds of read inactivity.
    pub sliding_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            absolute_ttl_seconds: 120,
            sliding_ttl_seconds: 60,
        }
    }
}

impl CacheConfig {
    /// Absolute TTL as a duration.
    pub fn absolute_ttl(&self) -> Duration {
        Duration::from_secs(self.absolute_ttl_seconds)
    }

    /// Sliding TTL as a duration.
    pub fn sliding_ttl(&self) -> Duration {
        Duration::from_secs(self.sliding_ttl_seconds)
    }
}
