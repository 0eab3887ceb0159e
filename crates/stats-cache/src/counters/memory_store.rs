//! In-process counter store.
//!
//! Mirrors the Redis semantics (zero-initialized hash fields, empty map for a
//! missing key) without a server. Used for dry runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use stats_core::{CounterStore, PortResult};

#[derive(Debug, Default)]
struct Inner {
    hashes: HashMap<String, HashMap<String, String>>,
    strings: HashMap<String, String>,
}

/// Counter store held in memory
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    inner: RwLock<Inner>,
    snapshots: AtomicUsize,
}

impl MemoryCounterStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots taken so far
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }

    /// Total number of keys (hashes and strings)
    pub fn key_count(&self) -> usize {
        let inner = self.inner.read();
        inner.hashes.len() + inner.strings.len()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn hash_increment(&self, key: &str, field: &str, amount: i64) -> PortResult<i64> {
        let mut inner = self.inner.write();
        let slot = inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".to_string());

        let current: i64 = slot.parse().map_err(|_| {
            stats_core::DomainError::StoreError(format!(
                "hash value is not an integer: {key}/{field}"
            ))
        })?;
        let next = current.checked_add(amount).ok_or_else(|| {
            stats_core::DomainError::StoreError(format!(
                "increment or decrement would overflow: {key}/{field}"
            ))
        })?;
        *slot = next.to_string();
        Ok(next)
    }

    async fn hash_get_all(&self, key: &str) -> PortResult<HashMap<String, i64>> {
        let inner = self.inner.read();
        let Some(hash) = inner.hashes.get(key) else {
            return Ok(HashMap::new());
        };

        hash.iter()
            .map(|(field, value)| {
                value.parse::<i64>().map(|v| (field.clone(), v)).map_err(|_| {
                    stats_core::DomainError::StoreError(format!(
                        "hash value is not an integer: {key}/{field}"
                    ))
                })
            })
            .collect()
    }

    async fn hash_get(&self, key: &str, field: &str) -> PortResult<Option<String>> {
        let inner = self.inner.read();
        Ok(inner.hashes.get(key).and_then(|h| h.get(field)).cloned())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> PortResult<()> {
        let mut inner = self.inner.write();
        inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.inner.read().strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.inner
            .write()
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn snapshot(&self) -> PortResult<()> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear_all(&self) -> PortResult<()> {
        let mut inner = self.inner.write();
        inner.hashes.clear();
        inner.strings.clear();
        Ok(())
    }
}
