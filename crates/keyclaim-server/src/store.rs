//! Record store interface and the in-memory backend.
//!
//! The authoritative name-to-record mapping is an external collaborator;
//! the reconciler consumes it through [`RecordStore`]. A concrete DNS
//! backend maps [`RecordKind::Owner`] to TXT and [`RecordKind::Address`]
//! to A records.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use keyclaim_core::{Result, UpdateError};

/// Kind of record bound to a fully-qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Binds a name to its owning public key (TXT analogue, long TTL).
    Owner,
    /// Binds a name to the owner's current address (A analogue, short TTL).
    Address,
}

/// A set of record values of one kind under one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub kind: RecordKind,
    pub values: Vec<String>,
    pub ttl: u32,
}

impl RecordSet {
    /// Single-value record set.
    pub fn single(kind: RecordKind, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            kind,
            values: vec![value.into()],
            ttl,
        }
    }
}

/// Additions and deletions applied atomically within one call.
///
/// Replacing a record means deleting the existing set and adding the new
/// one in the same change-set, so two conflicting sets of one kind never
/// coexist under a name.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub additions: Vec<RecordSet>,
    pub deletions: Vec<RecordSet>,
}

/// Narrow read/write interface over the record store backend.
///
/// Any I/O failure surfaces as [`UpdateError::Store`]; callers treat the
/// update as not-applied and may retry the whole request.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records currently bound to `fqdn`.
    async fn list_records(&self, fqdn: &str) -> Result<Vec<RecordSet>>;

    /// Apply a change-set to `fqdn`, atomic within this call.
    async fn apply_change(&self, fqdn: &str, change: ChangeSet) -> Result<()>;
}

/// In-memory record store.
///
/// Default backend for `serve` without an external store, and the backend
/// used throughout the test suite. Counts applied change-sets so tests can
/// assert write idempotence.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<RecordSet>>>,
    changes: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate records under a name, e.g. a reserved entry.
    pub fn seed(&self, fqdn: &str, records: Vec<RecordSet>) -> Result<()> {
        let mut map = self.lock_records()?;
        map.insert(fqdn.to_string(), records);
        Ok(())
    }

    /// Number of change-sets applied since construction.
    pub fn changes_applied(&self) -> usize {
        self.changes.load(Ordering::Relaxed)
    }

    fn lock_records(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<RecordSet>>>> {
        self.records
            .lock()
            .map_err(|e| UpdateError::Store(format!("memory store lock poisoned: {e}")))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_records(&self, fqdn: &str) -> Result<Vec<RecordSet>> {
        let map = self.lock_records()?;
        Ok(map.get(fqdn).cloned().unwrap_or_default())
    }

    async fn apply_change(&self, fqdn: &str, change: ChangeSet) -> Result<()> {
        let mut map = self.lock_records()?;
        let records = map.entry(fqdn.to_string()).or_default();
        records.retain(|existing| !change.deletions.contains(existing));
        records.extend(change.additions);
        self.changes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_unknown_name_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_records("nope.example.").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_deletes_old_set() {
        let store = MemoryStore::new();
        let fqdn = "home.example.";
        let old = RecordSet::single(RecordKind::Address, "1.2.3.4", 60);
        store.seed(fqdn, vec![old.clone()]).unwrap();

        store
            .apply_change(
                fqdn,
                ChangeSet {
                    additions: vec![RecordSet::single(RecordKind::Address, "5.6.7.8", 60)],
                    deletions: vec![old],
                },
            )
            .await
            .unwrap();

        let records = store.list_records(fqdn).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].values, vec!["5.6.7.8".to_string()]);
        assert_eq!(store.changes_applied(), 1);
    }
}
