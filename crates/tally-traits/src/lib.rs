//! # Tally Traits
//!
//! Trait definitions for the Tally transaction aggregation engine.
//!
//! This crate contains ONLY interface definitions with minimal
//! dependencies. Implementations live in extension crates
//! (`tally-ext-file`) and the engine itself (`tally-engine`).
//!
//! ## Module Structure
//!
//! - [`source`]: The [`TransactionSource`] adapter trait one upstream
//!   system implements
//! - [`error`]: [`SourceError`], the uniform adapter failure taxonomy
//! - [`cancel`]: Cooperative per-request cancellation
//!   ([`CancelHandle`]/[`CancelToken`])
//!
//! ## Dependency Injection
//!
//! The aggregation engine consumes these traits via injection:
//!
//! ```ignore
//! let service = AggregationService::new(vec![
//!     Arc::new(CoreBankingSource::new(core_path)),
//!     Arc::new(CardSwitchSource::new(card_path)),
//! ]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod error;
pub mod source;

// Re-export commonly used types
pub use cancel::{CancelHandle, CancelToken};
pub use error::SourceError;
pub use source::TransactionSource;
