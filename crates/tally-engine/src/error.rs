//! Engine error types.

use thiserror::Error;

use tally_traits::SourceError;

/// Result alias for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Aggregation error type.
///
/// The engine never recovers from a source failure: no retry, no
/// partial merge. Whatever a single adapter raised surfaces here as the
/// failure of the whole operation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A source adapter failed; work from the other adapters is discarded
    #[error("source {source} failed: {error}")]
    Source {
        /// Name of the failing adapter
        source: String,
        /// The underlying adapter failure
        #[source]
        error: SourceError,
    },

    /// The request was cancelled before completion
    #[error("cancelled")]
    Cancelled,

    /// Runtime fault inside the fan-out (a panicked adapter task)
    #[error("internal error: {0}")]
    Internal(String),
}
