//! Source adapter trait.
//!
//! One upstream system implements [`TransactionSource`]. The adapter
//! owns its wire/file format entirely; by the time records leave
//! `fetch_and_normalize` they are well-formed [`UnifiedTransaction`]s
//! and the engine does not re-validate them.

use async_trait::async_trait;

use tally_core::{CustomerId, UnifiedTransaction};

use crate::cancel::CancelToken;
use crate::error::SourceError;

/// A single upstream transaction source.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Stable identifier, stamped into every record this source produces.
    fn name(&self) -> &str;

    /// Fetch the customer's raw records and normalize them.
    ///
    /// "No data" conditions (missing backing data, unknown customer)
    /// return an empty batch; an error is reserved for genuinely
    /// exceptional conditions such as a malformed payload. The token
    /// should be observed across suspension points.
    async fn fetch_and_normalize(
        &self,
        customer_id: &CustomerId,
        cancel: &CancelToken,
    ) -> Result<Vec<UnifiedTransaction>, SourceError>;
}
