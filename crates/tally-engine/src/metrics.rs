//! Hit/miss instrumentation for the cache layer.
//!
//! An explicit registry injected into the decorator at construction —
//! counters live exactly as long as the decorator that owns them, not
//! as ambient process-wide state.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Exported name of the hit counter.
pub const HIT_COUNTER: &str = "transaction_cache_hits";
/// Exported name of the miss counter.
pub const MISS_COUNTER: &str = "transaction_cache_misses";

/// Tag pair attached to every counter increment.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheTag {
    /// Operation kind: `"txns"` or `"summary"`
    pub cache_prefix: String,
    /// Customer the request was for
    pub customer_id: String,
}

/// Hit/miss counts for one tag pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCounts {
    /// Cache hits recorded under the tag.
    pub hits: u64,
    /// Cache misses recorded under the tag.
    pub misses: u64,
}

/// Monotonic hit/miss counters with a per-tag breakdown.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    tagged: DashMap<CacheTag, TagCounts>,
}

impl CacheMetrics {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cache hit.
    pub fn record_hit(&self, cache_prefix: &str, customer_id: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        let mut counts = self
            .tagged
            .entry(Self::tag(cache_prefix, customer_id))
            .or_default();
        counts.hits += 1;
    }

    /// Record one cache miss.
    pub fn record_miss(&self, cache_prefix: &str, customer_id: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut counts = self
            .tagged
            .entry(Self::tag(cache_prefix, customer_id))
            .or_default();
        counts.misses += 1;
    }

    /// Total hits across all tags.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Total misses across all tags.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Counts recorded under one tag pair; zero if never seen.
    pub fn tagged(&self, cache_prefix: &str, customer_id: &str) -> TagCounts {
        self.tagged
            .get(&Self::tag(cache_prefix, customer_id))
            .map(|c| *c)
            .unwrap_or_default()
    }

    /// Full snapshot for external metrics collection.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            by_tag: self
                .tagged
                .iter()
                .map(|e| (e.key().clone(), *e.value()))
                .collect(),
        }
    }

    fn tag(cache_prefix: &str, customer_id: &str) -> CacheTag {
        CacheTag {
            cache_prefix: cache_prefix.to_string(),
            customer_id: customer_id.to_string(),
        }
    }
}

/// Point-in-time view of the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total hits across all tags.
    pub hits: u64,
    /// Total misses across all tags.
    pub misses: u64,
    /// Per-tag breakdown, unordered.
    pub by_tag: Vec<(CacheTag, TagCounts)>,
}
