//! Aggregation over concurrent source adapters.
//!
//! [`AggregationService`] fans one request out to every registered
//! [`TransactionSource`], joins all of them, and produces a merged,
//! filtered, newest-first view plus a per-category roll-up.
//!
//! # Design
//!
//! The service trait exists so the cache decorator and the engine are
//! interchangeable to callers, and so tests can substitute either side:
//!
//! - Mock sources under a real engine exercise the fan-out
//! - A mock inner service under the decorator exercises the cache

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tracing::{debug, info};

use tally_core::{CategorySummary, CustomerId, UnifiedTransaction};
use tally_traits::{CancelToken, SourceError, TransactionSource};

use crate::error::{AggregateError, AggregateResult};

// =============================================================================
// SERVICE TRAIT
// =============================================================================

/// Read operations exposed to callers.
///
/// Both operations return immutable snapshots; a snapshot handed out by
/// the cache layer may be shared between callers and must not be
/// mutated (the `Arc<[T]>` type enforces this).
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Every transaction for the customer, newest first.
    ///
    /// `from`/`to` bound the result inclusively when present.
    async fn get_all(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[UnifiedTransaction]>>;

    /// Per-category totals over the same window, descending by
    /// absolute total.
    async fn get_category_summary(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[CategorySummary]>>;
}

// =============================================================================
// AGGREGATION SERVICE
// =============================================================================

/// Orchestrates all registered source adapters into one unified view.
pub struct AggregationService {
    sources: Vec<Arc<dyn TransactionSource>>,
}

impl AggregationService {
    /// Create a service over the given adapters.
    pub fn new(sources: Vec<Arc<dyn TransactionSource>>) -> Self {
        Self { sources }
    }

    /// Fan out to every source concurrently and merge the batches.
    ///
    /// All-or-nothing: the first adapter failure aborts the remaining
    /// in-flight fetches and fails the whole operation, discarding any
    /// batches already collected.
    async fn fetch_merged(
        &self,
        customer_id: &CustomerId,
        cancel: &CancelToken,
    ) -> AggregateResult<Vec<UnifiedTransaction>> {
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let customer = customer_id.clone();
            let token = cancel.clone();
            tasks.spawn(async move {
                let batch = source.fetch_and_normalize(&customer, &token).await;
                (source.name().to_string(), batch)
            });
        }
        debug!(
            customer = %customer_id,
            sources = self.sources.len(),
            "fanning out to transaction sources"
        );

        let mut merged = Vec::new();
        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    match joined {
                        None => break,
                        Some(Ok((_, Ok(batch)))) => merged.extend(batch),
                        Some(Ok((_, Err(SourceError::Cancelled)))) => {
                            tasks.abort_all();
                            return Err(AggregateError::Cancelled);
                        }
                        Some(Ok((source, Err(error)))) => {
                            tasks.abort_all();
                            return Err(AggregateError::Source { source, error });
                        }
                        Some(Err(join_error)) => {
                            tasks.abort_all();
                            return Err(AggregateError::Internal(join_error.to_string()));
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(AggregateError::Cancelled);
                }
            }
        }
        Ok(merged)
    }
}

#[async_trait]
impl TransactionService for AggregationService {
    async fn get_all(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[UnifiedTransaction]>> {
        let merged = self.fetch_merged(customer_id, cancel).await?;
        let ordered = filter_and_sort(merged, from, to);
        info!(
            customer = %customer_id,
            count = ordered.len(),
            "aggregated transactions across sources"
        );
        Ok(ordered.into())
    }

    async fn get_category_summary(
        &self,
        customer_id: &CustomerId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> AggregateResult<Arc<[CategorySummary]>> {
        let txns = self.get_all(customer_id, from, to, cancel).await?;
        if txns.is_empty() {
            return Ok(Vec::new().into());
        }
        Ok(summarize(&txns).into())
    }
}

// =============================================================================
// PURE AGGREGATION STEPS
// =============================================================================

/// Inclusive date-range filter followed by a newest-first sort.
///
/// The sort is stable, so records with equal timestamps keep their
/// merge order.
pub(crate) fn filter_and_sort(
    mut txns: Vec<UnifiedTransaction>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<UnifiedTransaction> {
    if let Some(from) = from {
        txns.retain(|t| t.timestamp >= from);
    }
    if let Some(to) = to {
        txns.retain(|t| t.timestamp <= to);
    }
    txns.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    txns
}

/// Group by category and total each group, descending by absolute total.
///
/// Groups are accumulated in first-seen order and sorted stably, so
/// groups tying on absolute total keep that order.
pub(crate) fn summarize(txns: &[UnifiedTransaction]) -> Vec<CategorySummary> {
    let mut groups: Vec<CategorySummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in txns {
        match index.get(txn.category.as_str()) {
            Some(&i) => {
                groups[i].total_amount += txn.amount;
                groups[i].transaction_count += 1;
            }
            None => {
                index.insert(txn.category.as_str(), groups.len());
                groups.push(CategorySummary {
                    category: txn.category.clone(),
                    total_amount: txn.amount,
                    transaction_count: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.total_amount.abs().cmp(&a.total_amount.abs()));
    groups
}

// =============================================================================
// TESTS
// =============================================================================
