use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, trace};

use super::counter::SequenceCounter;
use super::store::{SequenceStore, StoreError};
use crate::core::BillingPeriod;

const KEY_PREFIX: &str = "sequence:";

/// Key/value cache owned by the persistence side.
pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    fn set(&self, key: &str, value: V);

    /// Drop every entry whose key starts with `prefix`. Returns how many went.
    fn invalidate_prefix(&self, prefix: &str) -> usize;
}

/// `RwLock<HashMap>` cache. A poisoned lock is recovered rather than
/// propagated.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> MemoryCache<V> {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: V) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        before - entries.len()
    }
}

/// Read-through cache in front of another [`SequenceStore`].
///
/// Reads may be stale; a stale read only makes the next compare-and-set
/// fail, which drops the cached entry so the retry reads the store.
pub struct CachedSequenceStore<S, C> {
    inner: S,
    cache: C,
}

impl<S, C> CachedSequenceStore<S, C>
where
    S: SequenceStore,
    C: Cache<SequenceCounter>,
{
    /// Put `cache` in front of `inner`.
    pub fn new(inner: S, cache: C) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Forget every cached counter.
    pub fn invalidate_all(&self) -> usize {
        self.cache.invalidate_prefix(KEY_PREFIX)
    }

    fn key(period: BillingPeriod) -> String {
        format!("{KEY_PREFIX}{period}")
    }
}

impl<S, C> SequenceStore for CachedSequenceStore<S, C>
where
    S: SequenceStore,
    C: Cache<SequenceCounter>,
{
    fn load(&self, period: BillingPeriod) -> Result<Option<SequenceCounter>, StoreError> {
        let key = Self::key(period);
        if let Some(hit) = self.cache.get(&key) {
            trace!(%period, "sequence counter cache hit");
            return Ok(Some(hit));
        }
        let loaded = self.inner.load(period)?;
        if let Some(counter) = &loaded {
            self.cache.set(&key, counter.clone());
        }
        Ok(loaded)
    }

    fn compare_and_set(
        &self,
        period: BillingPeriod,
        expected: Option<u64>,
        next: &SequenceCounter,
    ) -> Result<bool, StoreError> {
        let key = Self::key(period);
        let stored = self.inner.compare_and_set(period, expected, next)?;
        if stored {
            self.cache.set(&key, next.clone());
        } else {
            let dropped = self.cache.invalidate_prefix(&key);
            debug!(%period, dropped, "stale sequence counter evicted");
        }
        Ok(stored)
    }
}
