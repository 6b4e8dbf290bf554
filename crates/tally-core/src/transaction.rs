//! Normalized transaction and summary types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::ids::CustomerId;

/// One normalized financial event, as produced by a source adapter.
///
/// Instances are created fresh per request, never mutated, and either
/// discarded with the response or frozen into a shared cache snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTransaction {
    /// Source-scoped unique identifier
    pub transaction_id: String,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Signed amount; exact decimal, no binary-float rounding
    pub amount: Decimal,
    /// Settlement currency
    pub currency: Currency,
    /// When the transaction occurred (UTC)
    pub timestamp: DateTime<Utc>,
    /// Free-text description from the upstream system; may be empty
    pub description: String,
    /// Category label assigned at normalization time; never empty
    pub category: String,
    /// Name of the adapter that produced this record
    pub source_name: String,
}

/// Per-category aggregate derived from a set of transactions.
///
/// Totals preserve sign; the multiset of per-category totals sums to the
/// sum of the underlying transaction amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category label
    pub category: String,
    /// Decimal sum of member transaction amounts
    pub total_amount: Decimal,
    /// Number of member transactions
    pub transaction_count: usize,
}
