//! # Tally Core
//!
//! Core domain types for the Tally transaction aggregation engine.
//!
//! This crate provides the foundational building blocks used throughout Tally:
//!
//! - **Types**: [`UnifiedTransaction`], [`CategorySummary`], [`Currency`], [`CustomerId`]
//! - **Categorization**: the ordered keyword rule table behind [`categorize`]
//!
//! Everything here is synchronous and side-effect free; the async plumbing
//! lives in `tally-traits` and `tally-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod categorize;
pub mod currency;
pub mod ids;
pub mod transaction;

// Re-export commonly used types
pub use categorize::{categorize, OTHER_CATEGORY};
pub use currency::Currency;
pub use ids::CustomerId;
pub use transaction::{CategorySummary, UnifiedTransaction};
