//! Per-month invoice number sequencing.
//!
//! One [`SequenceCounter`] per (year, month). Every issuance is a single
//! conditional update on a [`SequenceStore`] (compare-and-set against the
//! last seen number), so concurrent callers never receive the same number.
//! Lost races are retried with backoff by [`InvoiceNumberSequencer`].
//!
//! ```
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use tagihan::sequence::*;
//!
//! let seq = InvoiceNumberSequencer::new(Arc::new(MemorySequenceStore::new()));
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! assert_eq!(seq.next(date, "FSN").unwrap(), "FSN/24/01/001");
//! assert_eq!(seq.next(date, "FSN").unwrap(), "FSN/24/01/002");
//! ```

mod cache;
mod counter;
mod sequencer;
mod store;

pub use cache::{Cache, CachedSequenceStore, MemoryCache};
pub use counter::SequenceCounter;
pub use sequencer::{InvoiceNumberSequencer, RetryPolicy};
pub use store::{MemorySequenceStore, SequenceStore, StoreError};

use crate::core::{Invoice, InvoiceBuilder, InvoiceError};

impl InvoiceBuilder {
    /// Mint a number through `sequencer` and build the draft.
    ///
    /// The draft is checked first, so a rejected draft never consumes a
    /// number; a sequencer failure aborts creation.
    pub fn issue(self, sequencer: &InvoiceNumberSequencer) -> Result<Invoice, InvoiceError> {
        self.check()?;
        let number = sequencer.next(self.invoice_date(), self.prefix_str())?;
        self.build_with_number(number)
    }
}
