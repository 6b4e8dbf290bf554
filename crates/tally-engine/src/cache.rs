//! TTL-bounded in-memory snapshot store.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

/// Snapshot cache with absolute and sliding expiry.
///
/// Each entry carries two deadlines: an absolute one fixed at write
/// time, and a sliding one pushed forward on every read. Whichever
/// fires first evicts the entry. Expired entries are collected lazily
/// on access; [`TtlCache::purge_expired`] sweeps the rest.
///
/// Individual `get`/`insert` calls are atomic, but a caller's
/// check-then-compute-then-store sequence around them is not.
pub struct TtlCache<T> {
    entries: DashMap<String, TtlEntry<T>>,
    absolute_ttl: Duration,
    sliding_ttl: Duration,
}

struct TtlEntry<T> {
    value: T,
    created_at: Instant,
    /// Fixed at write time.
    expires_at: Instant,
    /// Pushed forward on every read.
    idle_deadline: Instant,
}

impl<T: Clone> TtlCache<T> {
    /// Create a new cache with the given expiry policy.
    pub fn new(absolute_ttl: Duration, sliding_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            absolute_ttl,
            sliding_ttl,
        }
    }

    /// Fetch a live entry, refreshing its sliding window.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let mut entry = self.entries.get_mut(key)?;
            if now <= entry.expires_at && now <= entry.idle_deadline {
                entry.idle_deadline = now + self.sliding_ttl;
                return Some(entry.value.clone());
            }
        }

        // A deadline fired; drop the entry unless a concurrent write
        // replaced it in the meantime.
        if let Some((_, stale)) = self
            .entries
            .remove_if(key, |_, e| now > e.expires_at || now > e.idle_deadline)
        {
            trace!(
                key,
                age_ms = stale.created_at.elapsed().as_millis() as u64,
                "expired cache entry removed"
            );
        }
        None
    }

    /// Store a value, resetting both deadlines. An existing entry under
    /// the same key is replaced (last write wins).
    pub fn insert(&self, key: String, value: T) {
        let now = Instant::now();
        self.entries.insert(
            key,
            TtlEntry {
                value,
                created_at: now,
                expires_at: now + self.absolute_ttl,
                idle_deadline: now + self.sliding_ttl,
            },
        );
    }

    /// Number of stored entries, including not-yet-collected expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry whose absolute or sliding deadline has passed.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, e| now <= e.expires_at && now <= e.idle_deadline);
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
