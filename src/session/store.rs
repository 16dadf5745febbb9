//! Durable session store.
//!
//! Keyed entries of `"{chain_id}:{intent_id}"` → serialized unsigned
//! transaction (plus derivation path and pending stealth recipient).
//! Backed by a JSON file so the state survives a full process or page
//! restart; every mutation saves synchronously because the write must be
//! durable before the remote signing request goes out.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::payload::types::PendingTransaction;

/// Errors raised by the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A thread-safe, file-backed map of pending transactions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, PendingTransaction>>,
    persistence_path: Option<String>,
}

impl SessionStore {
    /// Create a store; `None` keeps it memory-only (tests).
    pub fn new(persistence_path: Option<String>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load existing entries from the file if it exists.
    pub fn load_from_file(path: &str) -> Result<Self, StoreError> {
        let store = Self::new(Some(path.to_string()));
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let map: HashMap<String, PendingTransaction> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                store.inner.insert(k, v);
            }
            tracing::info!(entries = store.inner.len(), path, "Loaded session store");
        }
        Ok(store)
    }

    fn save_to_file(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            let map: HashMap<_, _> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();
            serde_json::to_writer(writer, &map)?;
        }
        Ok(())
    }

    /// Insert or replace the entry for this (chain, intent) pair.
    ///
    /// Replacing keeps the invariant of at most one pending transaction per
    /// intent identifier.
    pub fn put(&self, pending: &PendingTransaction) -> Result<(), StoreError> {
        self.inner.insert(pending.store_key(), pending.clone());
        self.save_to_file()
    }

    /// Fetch the entry for a (chain, intent) pair.
    pub fn get(&self, chain_id: u64, intent_id: Uuid) -> Option<PendingTransaction> {
        self.inner
            .get(&format!("{chain_id}:{intent_id}"))
            .map(|r| r.value().clone())
    }

    /// Remove the entry for a (chain, intent) pair.
    pub fn remove(
        &self,
        chain_id: u64,
        intent_id: Uuid,
    ) -> Result<Option<PendingTransaction>, StoreError> {
        let removed = self
            .inner
            .remove(&format!("{chain_id}:{intent_id}"))
            .map(|(_, v)| v);
        if removed.is_some() {
            self.save_to_file()?;
        }
        Ok(removed)
    }

    /// All pending transactions for one chain, most recent first.
    pub fn pending_for_chain(&self, chain_id: u64) -> Vec<PendingTransaction> {
        let mut entries: Vec<_> = self
            .inner
            .iter()
            .filter(|r| r.value().chain_id == chain_id)
            .map(|r| r.value().clone())
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Bytes, U256};

    fn sample_pending(chain_id: u64, created_at: u64) -> PendingTransaction {
        PendingTransaction {
            intent_id: Uuid::new_v4(),
            chain_id,
            sender: Address::repeat_byte(1),
            derivation_path: "ethereum-1".to_string(),
            stealth_recipient: None,
            nonce: 0,
            gas_limit: 50_000,
            max_fee_per_gas: 100,
            max_priority_fee_per_gas: 2,
            to: Address::repeat_byte(2),
            value: U256::from(100u64),
            input: Bytes::new(),
            created_at,
        }
    }

    #[test]
    fn test_store_operations() {
        let store = SessionStore::new(None);
        let pending = sample_pending(1, 0);

        assert!(store.get(1, pending.intent_id).is_none());
        store.put(&pending).unwrap();
        assert_eq!(
            store.get(1, pending.intent_id).unwrap().intent_id,
            pending.intent_id
        );

        // Replacement, not duplication.
        store.put(&pending).unwrap();
        assert_eq!(store.len(), 1);

        store.remove(1, pending.intent_id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_chains_are_independently_keyed() {
        let store = SessionStore::new(None);
        let a = sample_pending(1, 10);
        let b = sample_pending(84532, 20);
        store.put(&a).unwrap();
        store.put(&b).unwrap();

        assert_eq!(store.pending_for_chain(1).len(), 1);
        assert_eq!(store.pending_for_chain(84532).len(), 1);
        assert!(store.pending_for_chain(10).is_empty());
    }

    #[test]
    fn test_most_recent_first() {
        let store = SessionStore::new(None);
        let old = sample_pending(1, 100);
        let new = sample_pending(1, 200);
        store.put(&old).unwrap();
        store.put(&new).unwrap();

        let entries = store.pending_for_chain(1);
        assert_eq!(entries[0].intent_id, new.intent_id);
    }

    #[test]
    fn test_persistence_round_trip() {
        let path = "test_session_store.json";
        let pending = sample_pending(11155111, 5);

        let store = SessionStore::new(Some(path.to_string()));
        store.put(&pending).unwrap();

        let loaded = SessionStore::load_from_file(path).unwrap();
        let entry = loaded.get(11155111, pending.intent_id).unwrap();
        assert_eq!(entry.derivation_path, "ethereum-1");
        assert_eq!(entry.to_typed(), pending.to_typed());

        std::fs::remove_file(path).unwrap_or_default();
    }
}
