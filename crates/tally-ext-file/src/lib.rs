//! # Tally Ext File
//!
//! File-backed source adapters for the Tally aggregation engine.
//!
//! Each upstream system drops a JSON document in its own shape; the
//! adapters here own those shapes and normalize them:
//!
//! - [`CoreBankingSource`]: array of ledger records
//! - [`CardSwitchSource`]: array of card authorizations
//! - [`MobileWalletSource`]: one statement object holding entries
//!
//! A missing backing file is a "no data" condition (empty batch); any
//! malformed payload raises `SourceError::MalformedRecord`. For live
//! upstreams, implement `tally_traits::TransactionSource` against the
//! real transport instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod sources;

pub use sources::{CardSwitchSource, CoreBankingSource, MobileWalletSource};

use std::path::Path;
use std::sync::Arc;

use tally_traits::TransactionSource;

/// Create the standard trio of file sources rooted at one data directory.
///
/// Expects `core_banking.json`, `card_switch.json` and
/// `mobile_wallet.json` under `data_dir`; any of them may be absent.
pub fn create_file_sources(data_dir: impl AsRef<Path>) -> Vec<Arc<dyn TransactionSource>> {
    let dir = data_dir.as_ref();
    vec![
        Arc::new(CoreBankingSource::new(dir.join("core_banking.json"))),
        Arc::new(CardSwitchSource::new(dir.join("card_switch.json"))),
        Arc::new(MobileWalletSource::new(dir.join("mobile_wallet.json"))),
    ]
}
