use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use super::counter::SequenceCounter;
use crate::core::{BillingPeriod, InvoiceError};

/// Failures reported by a sequence store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("sequence store unavailable: {0}")]
    Unavailable(String),

    /// Stored state is inconsistent (e.g. counter row for the wrong period).
    #[error("sequence store corrupt: {0}")]
    Corrupt(String),
}

impl From<StoreError> for InvoiceError {
    fn from(e: StoreError) -> Self {
        InvoiceError::Persistence(e.to_string())
    }
}

/// Persistence for per-period sequence counters.
///
/// Implementations must make `compare_and_set` a single atomic conditional
/// update, e.g. `UPDATE … SET current_number = $next WHERE year = $y AND
/// month = $m AND current_number = $expected` or an `INSERT` that fails on
/// an existing key when `expected` is `None`.
pub trait SequenceStore: Send + Sync {
    /// Current counter for `period`, if one was ever created.
    fn load(&self, period: BillingPeriod) -> Result<Option<SequenceCounter>, StoreError>;

    /// Store `next` only if the stored `current_number` still equals
    /// `expected` (`None`: only if no counter exists yet).
    ///
    /// Returns `Ok(false)` when another writer got there first.
    fn compare_and_set(
        &self,
        period: BillingPeriod,
        expected: Option<u64>,
        next: &SequenceCounter,
    ) -> Result<bool, StoreError>;
}

/// In-process store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    counters: Mutex<HashMap<BillingPeriod, SequenceCounter>>,
}

impl MemorySequenceStore {
    /// A store with no counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing counters, e.g. loaded from a previous run.
    pub fn with_counters(counters: impl IntoIterator<Item = SequenceCounter>) -> Self {
        Self {
            counters: Mutex::new(counters.into_iter().map(|c| (c.period(), c)).collect()),
        }
    }

    /// Snapshot of all counters, ordered by period.
    pub fn counters(&self) -> Result<Vec<SequenceCounter>, StoreError> {
        let guard = self.lock()?;
        let mut all: Vec<_> = guard.values().cloned().collect();
        all.sort_by_key(SequenceCounter::period);
        Ok(all)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<BillingPeriod, SequenceCounter>>, StoreError>
    {
        self.counters
            .lock()
            .map_err(|_| StoreError::Unavailable("counter map lock poisoned".into()))
    }
}

impl SequenceStore for MemorySequenceStore {
    fn load(&self, period: BillingPeriod) -> Result<Option<SequenceCounter>, StoreError> {
        Ok(self.lock()?.get(&period).cloned())
    }

    fn compare_and_set(
        &self,
        period: BillingPeriod,
        expected: Option<u64>,
        next: &SequenceCounter,
    ) -> Result<bool, StoreError> {
        if next.period() != period {
            return Err(StoreError::Corrupt(format!(
                "counter for {} written under key {period}",
                next.period()
            )));
        }

        let mut guard = self.lock()?;
        let current = guard.get(&period).map(|c| c.current_number);
        if current != expected {
            return Ok(false);
        }
        guard.insert(period, next.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> BillingPeriod {
        BillingPeriod::new(2024, 1).unwrap()
    }

    #[test]
    fn insert_only_when_absent() {
        let store = MemorySequenceStore::new();
        let first = SequenceCounter::first(jan(), "FSN");
        assert!(store.compare_and_set(jan(), None, &first).unwrap());
        assert!(!store.compare_and_set(jan(), None, &first).unwrap());
        assert_eq!(store.load(jan()).unwrap(), Some(first));
    }

    #[test]
    fn update_only_when_expected_matches() {
        let store = MemorySequenceStore::with_counters([SequenceCounter::first(jan(), "FSN")]);
        let stale = SequenceCounter {
            current_number: 5,
            ..SequenceCounter::first(jan(), "FSN")
        };
        assert!(!store.compare_and_set(jan(), Some(4), &stale).unwrap());
        let next = store.load(jan()).unwrap().unwrap().advanced("FSN");
        assert!(store.compare_and_set(jan(), Some(1), &next).unwrap());
        assert_eq!(store.load(jan()).unwrap().unwrap().current_number, 2);
    }

    #[test]
    fn wrong_key_is_corrupt() {
        let store = MemorySequenceStore::new();
        let feb = BillingPeriod::new(2024, 2).unwrap();
        let err = store.compare_and_set(jan(), None, &SequenceCounter::first(feb, "FSN"));
        assert!(matches!(err, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn counters_sorted_by_period() {
        let feb = BillingPeriod::new(2024, 2).unwrap();
        let store = MemorySequenceStore::with_counters([
            SequenceCounter::first(feb, "FSN"),
            SequenceCounter::first(jan(), "FSN"),
        ]);
        let periods: Vec<_> = store.counters().unwrap().iter().map(|c| c.month).collect();
        assert_eq!(periods, [1, 2]);
    }
}
