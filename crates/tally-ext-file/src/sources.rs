//! JSON file-backed transaction sources.
//!
//! Normalization rules shared by all three adapters:
//! - customer match is case-insensitive
//! - a record without an upstream id gets a minted uuid
//! - a missing amount normalizes to zero, a missing description to ""
//! - the timestamp is mandatory RFC 3339; anything else is a
//!   `MalformedRecord` failure
//! - currency is the feeds' settlement currency (ZAR)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::{categorize, Currency, CustomerId, UnifiedTransaction};
use tally_traits::{CancelToken, SourceError, TransactionSource};

const SOURCE_CURRENCY: Currency = Currency::ZAR;

async fn read_payload(source: &str, path: &Path) -> Result<Option<String>, SourceError> {
    match tokio::fs::read_to_string(path).await {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(source, path = %path.display(), "data file missing");
            Ok(None)
        }
        Err(e) => Err(SourceError::Io(e.to_string())),
    }
}

fn parse_document<'a, T: Deserialize<'a>>(source: &str, payload: &'a str) -> Result<T, SourceError> {
    serde_json::from_str(payload)
        .map_err(|e| SourceError::MalformedRecord(format!("{source}: {e}")))
}

fn parse_timestamp(source: &str, raw: &str) -> Result<DateTime<Utc>, SourceError> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| SourceError::MalformedRecord(format!("{source}: bad timestamp '{raw}': {e}")))
}

fn minted_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// CORE BANKING SOURCE
// =============================================================================

/// Core banking ledger feed: a JSON array of per-transaction records.
pub struct CoreBankingSource {
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CoreBankingRecord {
    cust: String,
    txn_id: Option<String>,
    amount: Option<Decimal>,
    when: String,
    text: Option<String>,
}

impl CoreBankingSource {
    /// Create a source reading the given JSON file.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TransactionSource for CoreBankingSource {
    fn name(&self) -> &str {
        "CoreBanking"
    }

    async fn fetch_and_normalize(
        &self,
        customer_id: &CustomerId,
        cancel: &CancelToken,
    ) -> Result<Vec<UnifiedTransaction>, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let Some(payload) = read_payload(self.name(), &self.file_path).await? else {
            return Ok(Vec::new());
        };
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        let records: Vec<CoreBankingRecord> = parse_document(self.name(), &payload)?;

        let mut batch = Vec::new();
        for record in records {
            if !record.cust.eq_ignore_ascii_case(customer_id.as_str()) {
                continue;
            }
            let timestamp = parse_timestamp(self.name(), &record.when)?;
            let description = record.text.unwrap_or_default();
            batch.push(UnifiedTransaction {
                transaction_id: record.txn_id.unwrap_or_else(minted_id),
                customer_id: CustomerId::new(record.cust),
                amount: record.amount.unwrap_or(Decimal::ZERO),
                currency: SOURCE_CURRENCY,
                timestamp,
                category: categorize(&description).to_string(),
                description,
                source_name: self.name().to_string(),
            });
        }

        info!(
            source = self.name(),
            customer = %customer_id,
            count = batch.len(),
            "normalized transactions"
        );
        Ok(batch)
    }
}

// =============================================================================
// CARD SWITCH SOURCE
// =============================================================================

/// Card switch feed: a JSON array of cleared card authorizations.
pub struct CardSwitchSource {
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CardSwitchRecord {
    customer: String,
    id: Option<String>,
    value: Option<Decimal>,
    timestamp: String,
    merchant: Option<String>,
}

impl CardSwitchSource {
    /// Create a source reading the given JSON file.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TransactionSource for CardSwitchSource {
    fn name(&self) -> &str {
        "CardSwitch"
    }

    async fn fetch_and_normalize(
        &self,
        customer_id: &CustomerId,
        cancel: &CancelToken,
    ) -> Result<Vec<UnifiedTransaction>, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let Some(payload) = read_payload(self.name(), &self.file_path).await? else {
            return Ok(Vec::new());
        };
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        let records: Vec<CardSwitchRecord> = parse_document(self.name(), &payload)?;

        let mut batch = Vec::new();
        for record in records {
            if !record.customer.eq_ignore_ascii_case(customer_id.as_str()) {
                continue;
            }
            let timestamp = parse_timestamp(self.name(), &record.timestamp)?;
            let description = record.merchant.unwrap_or_default();
            batch.push(UnifiedTransaction {
                transaction_id: record.id.unwrap_or_else(minted_id),
                customer_id: CustomerId::new(record.customer),
                amount: record.value.unwrap_or(Decimal::ZERO),
                currency: SOURCE_CURRENCY,
                timestamp,
                category: categorize(&description).to_string(),
                description,
                source_name: self.name().to_string(),
            });
        }

        info!(
            source = self.name(),
            customer = %customer_id,
            count = batch.len(),
            "normalized transactions"
        );
        Ok(batch)
    }
}

// =============================================================================
// MOBILE WALLET SOURCE
// =============================================================================

/// Mobile wallet feed: one statement object per file, entries inside.
///
/// Wallet entries carry no upstream id, so every fetch mints fresh ones.
pub struct MobileWalletSource {
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct WalletStatement {
    account: String,
    entries: Vec<WalletEntry>,
}

#[derive(Debug, Deserialize)]
struct WalletEntry {
    amt: Option<Decimal>,
    date: String,
    desc: Option<String>,
}

impl MobileWalletSource {
    /// Create a source reading the given JSON file.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TransactionSource for MobileWalletSource {
    fn name(&self) -> &str {
        "MobileWallet"
    }

    async fn fetch_and_normalize(
        &self,
        customer_id: &CustomerId,
        cancel: &CancelToken,
    ) -> Result<Vec<UnifiedTransaction>, SourceError> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        let Some(payload) = read_payload(self.name(), &self.file_path).await? else {
            return Ok(Vec::new());
        };
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        let statement: WalletStatement = parse_document(self.name(), &payload)?;
        if !statement.account.eq_ignore_ascii_case(customer_id.as_str()) {
            return Ok(Vec::new());
        }

        let mut batch = Vec::new();
        for entry in statement.entries {
            let timestamp = parse_timestamp(self.name(), &entry.date)?;
            let description = entry.desc.unwrap_or_default();
            batch.push(UnifiedTransaction {
                transaction_id: minted_id(),
                customer_id: CustomerId::new(statement.account.clone()),
                amount: entry.amt.unwrap_or(Decimal::ZERO),
                currency: SOURCE_CURRENCY,
                timestamp,
                category: categorize(&description).to_string(),
                description,
                source_name: self.name().to_string(),
            });
        }

        info!(
            source = self.name(),
            customer = %customer_id,
            count = batch.len(),
            "normalized transactions"
        );
        Ok(batch)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn cust(id: &str) -> CustomerId {
        CustomerId::new(id)
    }

    #[tokio::test]
    async fn test_core_banking_normalizes_matching_records() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "core_banking.json",
            r#"[
                {"cust":"cust-001","txn_id":"cb-1","amount":-120.50,"when":"2024-03-05T08:30:00Z","text":"Uber trip"},
                {"cust":"cust-999","txn_id":"cb-2","amount":-10.00,"when":"2024-03-06T09:00:00Z","text":"Spar"}
            ]"#,
        );
        let source = CoreBankingSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();

        assert_eq!(batch.len(), 1);
        let t = &batch[0];
        assert_eq!(t.transaction_id, "cb-1");
        assert_eq!(t.amount, dec!(-120.50));
        assert_eq!(t.currency, Currency::ZAR);
        assert_eq!(t.category, "Transport");
        assert_eq!(t.source_name, "CoreBanking");
        assert_eq!(
            t.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_customer_match_ignores_case() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "core_banking.json",
            r#"[{"cust":"CUST-001","txn_id":"cb-1","amount":5.00,"when":"2024-03-05T08:30:00Z","text":"Spar"}]"#,
        );
        let source = CoreBankingSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        // The record keeps the upstream's own spelling of the id.
        assert_eq!(batch[0].customer_id.as_str(), "CUST-001");
    }

    #[tokio::test]
    async fn test_missing_file_is_no_data() {
        let dir = TempDir::new().unwrap();
        let source = CoreBankingSource::new(dir.path().join("absent.json"));

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "core_banking.json", "definitely not json");
        let source = CoreBankingSource::new(path);

        let err = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::MalformedRecord(_)));
    }

    #[tokio::test]
    async fn test_malformed_timestamp_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "core_banking.json",
            r#"[{"cust":"cust-001","txn_id":"cb-1","amount":1.00,"when":"yesterday","text":"Spar"}]"#,
        );
        let source = CoreBankingSource::new(path);

        let err = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::MalformedRecord(_)));
    }

    #[tokio::test]
    async fn test_optional_fields_default() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "core_banking.json",
            r#"[{"cust":"cust-001","when":"2024-03-05T08:30:00Z"}]"#,
        );
        let source = CoreBankingSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();

        let t = &batch[0];
        assert!(!t.transaction_id.is_empty());
        assert_eq!(t.amount, Decimal::ZERO);
        assert_eq!(t.description, "");
        assert_eq!(t.category, "Other");
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "core_banking.json", "[]");
        let source = CoreBankingSource::new(path);

        let (handle, token) = tally_traits::CancelHandle::new();
        handle.cancel();

        let err = source
            .fetch_and_normalize(&cust("cust-001"), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Cancelled));
    }

    #[tokio::test]
    async fn test_card_switch_mints_missing_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "card_switch.json",
            r#"[
                {"customer":"cust-001","id":"cs-1","value":15000.00,"timestamp":"2024-03-01T06:00:00Z","merchant":"ACME PAYROLL"},
                {"customer":"cust-001","value":-45.00,"timestamp":"2024-03-07T09:15:00Z","merchant":"Bolt ride"}
            ]"#,
        );
        let source = CardSwitchSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].transaction_id, "cs-1");
        assert_eq!(batch[0].category, "Income");
        assert!(!batch[1].transaction_id.is_empty());
        assert_eq!(batch[1].category, "Transport");
        assert_eq!(batch[1].amount, dec!(-45.00));
    }

    #[tokio::test]
    async fn test_wallet_account_mismatch_is_no_data() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "mobile_wallet.json",
            r#"{"account":"cust-999","entries":[{"amt":-35.00,"date":"2024-03-04T18:45:00Z","desc":"MTN airtime"}]}"#,
        );
        let source = MobileWalletSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_wallet_entries_normalize_with_minted_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(
            &dir,
            "mobile_wallet.json",
            r#"{"account":"cust-001","entries":[
                {"amt":-35.00,"date":"2024-03-04T18:45:00Z","desc":"MTN airtime"},
                {"date":"2024-03-02T10:00:00Z","desc":"Unknown merchant"}
            ]}"#,
        );
        let source = MobileWalletSource::new(path);

        let batch = source
            .fetch_and_normalize(&cust("cust-001"), &CancelToken::never())
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_ne!(batch[0].transaction_id, batch[1].transaction_id);
        assert_eq!(batch[0].category, "Airtime");
        assert_eq!(batch[1].amount, Decimal::ZERO);
        assert_eq!(batch[1].category, "Other");
        assert_eq!(batch[1].source_name, "MobileWallet");
    }
}
