//! # Transaction History Store
//!
//! A bounded, per-account record of recent transaction attempts, persisted
//! through the key-value port on every mutation so a reload mid-confirmation
//! still shows the attempt.
//!
//! One account is active at a time: activating an account loads its
//! persisted records and discards the previous account's in-memory state,
//! so histories never leak across accounts. Records are newest first and
//! capped at [`MAX_RECENT`]; the oldest record is evicted, not archived.
//!
//! Components share one store through [`SharedHistory`] - an explicit
//! injected handle, the single ownership point for appends and status
//! updates.

use std::sync::Arc;

use lib_core::error::Result;
use lib_core::store::KvStore;
use lib_utils::time::now_millis;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

/// Maximum number of records retained per account.
pub const MAX_RECENT: usize = 5;

/// Confirmation status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Finalized,
    Error,
}

/// One transaction attempt, keyed by its network-assigned signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    pub status: TxStatus,
    /// Creation time, UTC milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionRecord {
    /// A fresh record for a just-submitted transaction.
    pub fn pending(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            status: TxStatus::Pending,
            timestamp: now_millis(),
            error: None,
        }
    }
}

/// Shared handle to the one history store of the process.
pub type SharedHistory = Arc<Mutex<TransactionHistory>>;

/// Per-account transaction history backed by the key-value port.
pub struct TransactionHistory {
    store: Arc<dyn KvStore>,
    active: Option<AccountHistory>,
}

struct AccountHistory {
    owner: Pubkey,
    records: Vec<TransactionRecord>,
}

impl TransactionHistory {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            active: None,
        }
    }

    /// Wrap a new history in the shared handle components are given.
    pub fn shared(store: Arc<dyn KvStore>) -> SharedHistory {
        Arc::new(Mutex::new(Self::new(store)))
    }

    /// Load the persisted history for `owner`, replacing any previously
    /// active account's in-memory state.
    ///
    /// Absent or unreadable persisted data yields an empty history.
    pub fn activate(&mut self, owner: Pubkey) -> Result<()> {
        let records = match self.store.get(&storage_key(&owner))? {
            Some(raw) => match serde_json::from_str::<Vec<TransactionRecord>>(&raw) {
                Ok(mut records) => {
                    records.truncate(MAX_RECENT);
                    records
                }
                Err(e) => {
                    warn!("discarding unreadable history for {owner}: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!("activated history for {owner} ({} records)", records.len());
        self.active = Some(AccountHistory { owner, records });
        Ok(())
    }

    /// Discard the active account's in-memory history (wallet disconnect).
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    /// The currently active account, if any.
    pub fn owner(&self) -> Option<&Pubkey> {
        self.active.as_ref().map(|active| &active.owner)
    }

    /// Records for the active account, newest first. Empty when no account
    /// is active.
    pub fn records(&self) -> &[TransactionRecord] {
        self.active
            .as_ref()
            .map(|active| active.records.as_slice())
            .unwrap_or(&[])
    }

    /// Insert a record at the front, evicting beyond [`MAX_RECENT`], and
    /// persist. A no-op when no account is active.
    pub fn append(&mut self, record: TransactionRecord) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            debug!("append with no active account, dropping record");
            return Ok(());
        };

        active.records.insert(0, record);
        active.records.truncate(MAX_RECENT);
        self.persist()
    }

    /// Mutate the status (and error message) of the record with `signature`
    /// in place, then persist.
    ///
    /// A signature that is not present - already evicted, or never recorded -
    /// is a silent no-op, not an error.
    pub fn update_status(
        &mut self,
        signature: &str,
        status: TxStatus,
        error: Option<String>,
    ) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let Some(record) = active
            .records
            .iter_mut()
            .find(|record| record.signature == signature)
        else {
            debug!("status update for unknown signature {signature}, ignoring");
            return Ok(());
        };

        record.status = status;
        record.error = error;
        self.persist()
    }

    /// Rewrite the active account's full sequence through the store.
    fn persist(&self) -> Result<()> {
        let Some(active) = self.active.as_ref() else {
            return Ok(());
        };
        let raw = serde_json::to_string(&active.records)?;
        self.store.set(&storage_key(&active.owner), &raw)
    }
}

fn storage_key(owner: &Pubkey) -> String {
    format!("transactions_{owner}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::store::MemoryStore;

    fn history_with_store() -> (TransactionHistory, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TransactionHistory::new(store.clone()), store)
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let (mut history, _) = history_with_store();
        let owner = Pubkey::new_unique();
        history.activate(owner).unwrap();

        for i in 0..8 {
            history
                .append(TransactionRecord::pending(format!("sig-{i}")))
                .unwrap();
        }

        let records = history.records();
        assert_eq!(records.len(), MAX_RECENT);
        let signatures: Vec<&str> = records.iter().map(|r| r.signature.as_str()).collect();
        assert_eq!(signatures, vec!["sig-7", "sig-6", "sig-5", "sig-4", "sig-3"]);
    }

    #[test]
    fn test_update_status_mutates_in_place() {
        let (mut history, _) = history_with_store();
        history.activate(Pubkey::new_unique()).unwrap();
        history.append(TransactionRecord::pending("sig-a")).unwrap();

        history
            .update_status("sig-a", TxStatus::Error, Some("blockhash expired".to_string()))
            .unwrap();

        let record = &history.records()[0];
        assert_eq!(record.status, TxStatus::Error);
        assert_eq!(record.error.as_deref(), Some("blockhash expired"));
    }

    #[test]
    fn test_update_status_unknown_signature_is_noop() {
        let (mut history, _) = history_with_store();
        history.activate(Pubkey::new_unique()).unwrap();
        history.append(TransactionRecord::pending("sig-a")).unwrap();

        history
            .update_status("sig-missing", TxStatus::Confirmed, None)
            .unwrap();

        assert_eq!(history.records()[0].status, TxStatus::Pending);
    }

    #[test]
    fn test_append_without_active_account_is_noop() {
        let (mut history, store) = history_with_store();
        history.append(TransactionRecord::pending("sig-a")).unwrap();
        assert!(history.records().is_empty());
        assert!(store
            .get(&storage_key(&Pubkey::new_unique()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_round_trip_through_persistence() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let owner = Pubkey::new_unique();

        let mut history = TransactionHistory::new(store.clone());
        history.activate(owner).unwrap();
        history.append(TransactionRecord::pending("sig-a")).unwrap();
        history.append(TransactionRecord::pending("sig-b")).unwrap();
        history
            .update_status("sig-a", TxStatus::Confirmed, None)
            .unwrap();

        // A fresh history over the same store sees the same sequence.
        let mut reloaded = TransactionHistory::new(store);
        reloaded.activate(owner).unwrap();

        let records = reloaded.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].signature, "sig-b");
        assert_eq!(records[0].status, TxStatus::Pending);
        assert_eq!(records[1].signature, "sig-a");
        assert_eq!(records[1].status, TxStatus::Confirmed);
    }

    #[test]
    fn test_account_switch_does_not_leak() {
        let (mut history, _) = history_with_store();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();

        history.activate(first).unwrap();
        history.append(TransactionRecord::pending("sig-first")).unwrap();

        history.activate(second).unwrap();
        assert!(history.records().is_empty());
        history
            .append(TransactionRecord::pending("sig-second"))
            .unwrap();

        // Switching back restores the first account's records only.
        history.activate(first).unwrap();
        assert_eq!(history.records().len(), 1);
        assert_eq!(history.records()[0].signature, "sig-first");
    }

    #[test]
    fn test_deactivate_discards_in_memory_state() {
        let (mut history, _) = history_with_store();
        let owner = Pubkey::new_unique();
        history.activate(owner).unwrap();
        history.append(TransactionRecord::pending("sig-a")).unwrap();

        history.deactivate();
        assert!(history.owner().is_none());
        assert!(history.records().is_empty());

        // The persisted copy survives disconnect.
        history.activate(owner).unwrap();
        assert_eq!(history.records().len(), 1);
    }

    #[test]
    fn test_corrupt_persisted_history_yields_empty() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let owner = Pubkey::new_unique();
        store.set(&storage_key(&owner), "not json").unwrap();

        let mut history = TransactionHistory::new(store);
        history.activate(owner).unwrap();
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_error_field_omitted_when_absent() {
        let record = TransactionRecord::pending("sig-a");
        let raw = serde_json::to_string(&record).unwrap();
        assert!(!raw.contains("error"));
        assert!(raw.contains("\"status\":\"pending\""));
    }
}
