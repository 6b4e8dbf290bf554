//! Cache-aside decorator over the aggregation service.
//!
//! Repeated reads for the same customer and date range reuse the same
//! materialized snapshot. The decorator checks the store first, and on
//! a miss computes through the wrapped service and writes back; the
//! check-then-fetch-then-store sequence is deliberately not atomic, so
//! concurrent misses for one key each invoke the wrapped service and
//! the last store wins.
//!
//! A blank customer id bypasses the cache entirely: there is no safe
//! cache partition for an unidentified customer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use tally_core::{CategorySummary, CustomerId, UnifiedTransaction};
use tally_traits::CancelToken;

use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::error::{AggregateError, AggregateResult};
use crate::metrics::CacheMetrics;
use crate::service::TransactionService;

/// Key prefix for the transaction-list operation.
pub const TXNS_PREFIX: &str = "txns";
/// Key prefix for the category-summary operation.
pub const SUMMARY_PREFIX: &str = "summary";

/// Read-through cache decorator for a [`TransactionService`].
///
/// Holds one typed store per operation; together with the key prefix
/// that makes collisions between the two operations impossible.
pub struct CachedTransactionService {
    inner: Arc<dyn TransactionService>,
    transactions: TtlCache<Arc<[UnifiedTransaction]>>,
    summaries: TtlCache<Arc<[CategorySummary]>>,
    metrics: Arc<CacheMetrics>,
}

impl CachedTransactionService {
    /// Wrap a service with the given cache policy and metrics registry.
    pub fn new(
        inner: Arc<dyn TransactionService>,
        config: &CacheConfig,
        metrics: Arc<CacheMetrics>,
    ) -> Self {
        Self::with_ttls(inner, config.absolute_ttl(), config.sliding_ttl(), metrics)
    }

    /// Wrap with explicit durations. Tests use this for tight windows.
    pub fn with_ttls(
        inner: Arc<dyn TransactionService>,
        absolute_ttl: Duration,
        sliding_ttl: Duration,
        metrics: Arc<CacheMetrics>,
    ) -> Self {
        Self {
            inner,
            transactions: TtlCache::new(absolute_ttl, sliding_ttl),
            summaries: TtlCache::new(absolute_ttl, sliding_ttl),
            metrics,
        }
    }

    /// The injected metrics registry.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    async fn execute_with_cache<T, F>(
        &self,
        store: &TtlCache<Arc<[T]>>,
        prefix: &'static str,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
        fetch: F,
    ) -> AggregateResult<Arc<[T]>>
    where
        T: Send + Sync,
        F: Future<Output = AggregateResult<Arc<[T]>>> + Send,
    {
        if customer_id.is_blank() {
            return fetch.await;
        }
        if cancel.is_cancelled() {
            return Err(AggregateError::Cancelled);
        }

        let key = cache_key(prefix, customer_id, from, to);
        if let Some(snapshot) = store.get(&key) {
            self.metrics.record_hit(prefix, customer_id.as_str());
            debug!(prefix, customer = %customer_id, key = %key, "cache hit");
            return Ok(snapshot);
        }

        self.metrics.record_miss(prefix, customer_id.as_str());
        debug!(prefix, customer = %customer_id, key = %key, "cache miss");

        // Only a fully successful fetch is stored; errors and
        // cancellations leave the store untouched.
        let fresh = fetch.await?;
        store.insert(key, Arc::clone(&fresh));
        debug!(
            prefix,
            customer = %customer_id,
            count = fresh.len(),
            "stored cache snapshot"
        );
        Ok(fresh)
    }
}

#[async_trait]
impl TransactionService for CachedTransactionService {
    async fn get_all(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[UnifiedTransaction]>> {
        self.execute_with_cache(
            &self.transactions,
            TXNS_PREFIX,
            customer_id,
            from,
            to,
            cancel,
            self.inner.get_all(customer_id, from, to, cancel),
        )
        .await
    }

    async fn get_category_summary(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[CategorySummary]>> {
        self.execute_with_cache(
            &self.summaries,
            SUMMARY_PREFIX,
            customer_id,
            from,
            to,
            cancel,
            self.inner.get_category_summary(customer_id, from, to, cancel),
        )
        .await
    }
}

/// Builds `"<prefix>:<customer>:<from|none>:<to|none>"`; bounds are
/// encoded as exact Unix-epoch milliseconds.
fn cache_key(
    prefix: &str,
    customer_id: &CustomerId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> String {
    fn bound(ts: Option<DateTime<Utc>>) -> String {
        ts.map_or_else(|| "none".to_string(), |t| t.timestamp_millis().to_string())
    }
    format!("{}:{}:{}:{}", prefix, customer_id, bound(from), bound(to))
}
