//! Error types for source adapter operations.

use thiserror::Error;

/// Failure raised by a source adapter's fetch.
///
/// Every adapter raises the same taxonomy: a payload that cannot be
/// normalized is always `MalformedRecord`, whatever the underlying wire
/// format. Missing backing data is not an error (adapters return an
/// empty batch instead).
#[derive(Debug, Error)]
pub enum SourceError {
    /// Payload could not be parsed or normalized (bad document
    /// structure, unparseable timestamp)
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// IO error while reading the upstream
    #[error("IO error: {0}")]
    Io(String),

    /// The fetch observed the request's cancellation signal
    #[error("cancelled")]
    Cancelled,
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e.to_string())
    }
}
