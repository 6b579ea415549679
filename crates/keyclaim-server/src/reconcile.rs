//! Record reconciliation: verified update in, minimal record mutations out.
//!
//! Per fully-qualified name the state machine is `Unclaimed ->
//! Claimed(owner key)` with no further transitions: the first key to claim
//! a name keeps it, and nothing here ever deletes a record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::store::{ChangeSet, RecordKind, RecordSet, RecordStore};
use keyclaim_core::{Result, UpdateError};

/// What a successful reconciliation did.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    /// The fully-qualified name that was updated.
    pub fqdn: String,
    /// True when this request created the ownership record.
    pub first_claim: bool,
    /// True when an address record was written; false when the address was
    /// already current.
    pub address_written: bool,
}

/// Applies verified updates to the record store.
pub struct Reconciler {
    store: Arc<dyn RecordStore>,
    domain: String,
    ownership_ttl: u32,
    address_ttl: u32,
    // Serializes read-then-write per name so two concurrent requests cannot
    // both pass the ownership check before either write lands.
    name_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Reconciler {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            domain: config.domain.clone(),
            ownership_ttl: config.ownership_ttl_secs,
            address_ttl: config.address_ttl_secs,
            name_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The key under which all records for `subdomain` are stored.
    #[must_use]
    pub fn fqdn(&self, subdomain: &str) -> String {
        format!("{subdomain}.{}.", self.domain)
    }

    /// Apply a verified update for `subdomain` from the holder of
    /// `public_key`, pointing the name at `new_address`.
    pub async fn apply(
        &self,
        subdomain: &str,
        public_key: &str,
        new_address: &str,
    ) -> Result<ClaimOutcome> {
        let fqdn = self.fqdn(subdomain);
        let name_lock = self.lock_for(&fqdn)?;
        let guard = name_lock.lock().await;
        let result = self.reconcile_locked(&fqdn, public_key, new_address).await;
        drop(guard);
        self.evict_unused(&fqdn, &name_lock);
        result
    }

    async fn reconcile_locked(
        &self,
        fqdn: &str,
        public_key: &str,
        new_address: &str,
    ) -> Result<ClaimOutcome> {
        let records = self.store.list_records(fqdn).await?;

        let mut first_claim = false;
        let mut old_value = String::new();
        let mut existing_address: Option<RecordSet> = None;

        if records.is_empty() {
            info!(%fqdn, key = %public_key, "adding new owner");
            self.store
                .apply_change(
                    fqdn,
                    ChangeSet {
                        additions: vec![RecordSet::single(
                            RecordKind::Owner,
                            public_key,
                            self.ownership_ttl,
                        )],
                        deletions: Vec::new(),
                    },
                )
                .await?;
            first_claim = true;
        } else {
            let owner = records
                .iter()
                .find(|r| r.kind == RecordKind::Owner && !r.values.is_empty());
            let Some(owner) = owner else {
                // Records exist but none of ours: a pre-existing entry this
                // protocol must not touch.
                return Err(UpdateError::ReservedName {
                    fqdn: fqdn.to_string(),
                });
            };
            let owner_key = owner.values[0].trim_matches('"');
            debug!(%fqdn, key = %owner_key, "name has an owner");
            if owner_key != public_key {
                return Err(UpdateError::OwnershipConflict {
                    fqdn: fqdn.to_string(),
                });
            }

            if let Some(address) = records
                .iter()
                .find(|r| r.kind == RecordKind::Address && !r.values.is_empty())
            {
                old_value = address.values[0].trim_matches('"').to_string();
                existing_address = Some(address.clone());
            }
        }

        let address_written = old_value != new_address;
        if address_written {
            self.store
                .apply_change(
                    fqdn,
                    ChangeSet {
                        additions: vec![RecordSet::single(
                            RecordKind::Address,
                            new_address,
                            self.address_ttl,
                        )],
                        deletions: existing_address.into_iter().collect(),
                    },
                )
                .await?;
        }

        Ok(ClaimOutcome {
            fqdn: fqdn.to_string(),
            first_claim,
            address_written,
        })
    }

    fn lock_for(&self, fqdn: &str) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .name_locks
            .lock()
            .map_err(|e| UpdateError::Store(format!("name lock poisoned: {e}")))?;
        Ok(locks
            .entry(fqdn.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }

    /// Drop the map entry for `fqdn` when no other task holds a handle to
    /// it (map + ours = 2). The map mutex is held across the count check,
    /// and `lock_for` clones only under that same mutex, so the count
    /// cannot race upward here.
    fn evict_unused(&self, fqdn: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut locks) = self.name_locks.lock() {
            if Arc::strong_count(lock) == 2 {
                locks.remove(fqdn);
            }
        }
    }

    #[cfg(test)]
    fn live_name_locks(&self) -> usize {
        self.name_locks.lock().map_or(usize::MAX, |locks| locks.len())
    }
}
