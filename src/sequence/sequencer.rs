use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::counter::SequenceCounter;
use super::store::{SequenceStore, StoreError};
use crate::core::{BillingPeriod, InvoiceError, InvoiceNumber, is_valid_prefix};

/// Retry behaviour for lost compare-and-set races.
///
/// Mapped onto a randomized [`ExponentialBackoff`]: losers of the same round
/// wake at different times instead of colliding again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per `next` call, including the first.
    pub max_attempts: u32,
    /// Mean sleep after the first lost race; doubles each time.
    pub initial_backoff_ms: u64,
    /// Upper bound for the mean of a single sleep.
    pub max_backoff_ms: u64,
    /// Give up once this much time has passed since the first attempt.
    pub deadline_ms: u64,
    /// Each sleep is drawn from `mean * (1 ± jitter)`; 0 disables jitter.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 32,
            initial_backoff_ms: 10,
            max_backoff_ms: 100,
            deadline_ms: 5_000,
            jitter: 0.5,
        }
    }
}

impl RetryPolicy {
    /// The backoff schedule for one `next` call.
    pub fn exponential(&self) -> ExponentialBackoff {
        let initial = Duration::from_millis(self.initial_backoff_ms);
        ExponentialBackoff {
            current_interval: initial,
            initial_interval: initial,
            max_interval: Duration::from_millis(self.max_backoff_ms),
            max_elapsed_time: Some(self.deadline()),
            multiplier: 2.0,
            randomization_factor: self.jitter.clamp(0.0, 1.0),
            ..ExponentialBackoff::default()
        }
    }

    /// `deadline_ms` as a [`Duration`].
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

/// Issues `PREFIX/YY/MM/NNN` invoice numbers, unique per (year, month).
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct InvoiceNumberSequencer {
    store: Arc<dyn SequenceStore>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for InvoiceNumberSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceNumberSequencer")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl InvoiceNumberSequencer {
    /// A sequencer over `store` with the default [`RetryPolicy`].
    pub fn new(store: Arc<dyn SequenceStore>) -> Self {
        Self {
            store,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issue the next number for the month of `invoice_date`.
    ///
    /// The first call for a period creates its counter at 1; later calls
    /// advance it by exactly one through a conditional update. Numbers are
    /// never reused, even if the invoice is later deleted.
    ///
    /// Errors: `InvalidArgument` for a bad prefix, `Persistence` if the
    /// store fails, `TransientConflict` when every attempt lost its race.
    pub fn next(&self, invoice_date: NaiveDate, prefix: &str) -> Result<String, InvoiceError> {
        check_prefix(prefix)?;

        let period = BillingPeriod::from_date(invoice_date);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;

        let attempt = || {
            attempts += 1;
            match self.try_issue(period, prefix) {
                Ok(Some(number)) => Ok(number),
                Ok(None) => {
                    let conflict = InvoiceError::TransientConflict {
                        period: period.to_string(),
                        attempts,
                    };
                    if attempts >= max_attempts {
                        Err(backoff::Error::permanent(conflict))
                    } else {
                        Err(backoff::Error::transient(conflict))
                    }
                }
                Err(e) => Err(backoff::Error::permanent(InvoiceError::from(e))),
            }
        };
        let on_conflict = |_: InvoiceError, pause: Duration| {
            warn!(%period, ?pause, "sequence update lost a race, retrying");
        };

        match backoff::retry_notify(self.policy.exponential(), attempt, on_conflict) {
            Ok(number) => {
                debug!(%period, %number, attempts, "invoice number issued");
                Ok(number)
            }
            Err(backoff::Error::Permanent(e) | backoff::Error::Transient { err: e, .. }) => {
                error!(%period, attempts, error = %e, "giving up on sequence update");
                Err(e)
            }
        }
    }

    /// The number `next` would issue now, without consuming it.
    /// Another caller may take it first.
    pub fn peek(&self, invoice_date: NaiveDate, prefix: &str) -> Result<String, InvoiceError> {
        check_prefix(prefix)?;
        let period = BillingPeriod::from_date(invoice_date);
        let upcoming = match self.store.load(period)? {
            None => 1,
            Some(c) => c.current_number + 1,
        };
        Ok(InvoiceNumber::new(prefix, period, upcoming).to_string())
    }

    /// One load plus one conditional update. `Ok(None)` means the race was lost.
    fn try_issue(&self, period: BillingPeriod, prefix: &str) -> Result<Option<String>, StoreError> {
        let current = self.store.load(period).inspect_err(|e| {
            error!(%period, error = %e, "failed to load sequence counter");
        })?;
        let (expected, next) = match current {
            None => (None, SequenceCounter::first(period, prefix)),
            Some(c) => (Some(c.current_number), c.advanced(prefix)),
        };

        let stored = self
            .store
            .compare_and_set(period, expected, &next)
            .inspect_err(|e| {
                error!(%period, error = %e, "failed to store sequence counter");
            })?;
        if !stored {
            debug!(%period, ?expected, "compare-and-set lost");
            return Ok(None);
        }
        Ok(Some(
            InvoiceNumber::new(prefix, period, next.current_number).to_string(),
        ))
    }
}

fn check_prefix(prefix: &str) -> Result<(), InvoiceError> {
    if !is_valid_prefix(prefix) {
        return Err(InvoiceError::InvalidArgument(format!(
            "prefix '{prefix}' must be 2-5 uppercase letters"
        )));
    }
    Ok(())
}
