//! # Tally Engine
//!
//! The concurrent aggregation engine for Tally.
//!
//! This crate provides:
//! - [`AggregationService`]: fan-out to all registered sources, merge,
//!   date-range filter, newest-first sort, category roll-up
//! - [`CachedTransactionService`]: cache-aside decorator over both read
//!   operations, with absolute + sliding TTLs
//! - [`TtlCache`]: the shared snapshot store behind the decorator
//! - [`CacheMetrics`]: injected hit/miss instrumentation
//!
//! ## Architecture
//!
//! ```text
//! caller ──> CachedTransactionService ── miss ──> AggregationService ──┬──> TransactionSource
//!                      │                                               ├──> TransactionSource
//!                   TtlCache <── immutable snapshot <── merge/sort ────┴──> TransactionSource
//! ```
//!
//! Failure policy is fail-fast: any source failure fails the whole
//! aggregation and nothing is cached. Concurrent misses for one key each
//! invoke the engine independently (no single-flight coalescing).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod cached;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;

// Re-exports
pub use cache::TtlCache;
pub use cached::{CachedTransactionService, SUMMARY_PREFIX, TXNS_PREFIX};
pub use config::CacheConfig;
pub use error::{AggregateError, AggregateResult};
pub use metrics::{CacheMetrics, CacheTag, MetricsSnapshot, TagCounts, HIT_COUNTER, MISS_COUNTER};
pub use service::{AggregationService, TransactionService};
