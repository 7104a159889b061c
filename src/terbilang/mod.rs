//! Indonesian amount-in-words ("terbilang") for printed invoices.
//!
//! Amounts pass through [`round_money`](crate::core::round_money) first, so
//! `1000.50` is spelled as `1001`. Supported magnitude: up to
//! 999 999 999 999 999 (Triliun is the largest named group).
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tagihan::terbilang::*;
//!
//! assert_eq!(to_words(dec!(1000)).unwrap(), "Seribu");
//! assert_eq!(to_words(dec!(21)).unwrap(), "Dua Puluh Satu");
//! assert_eq!(to_invoice_words(dec!(0)).unwrap(), "Nol Rupiah");
//! ```

mod words;

pub use words::{CURRENCY_WORD, MAX_SUPPORTED, to_invoice_words, to_words, to_words_with_unit};

use crate::core::{Invoice, InvoiceError};

impl Invoice {
    /// Total amount spelled out with the currency word, as printed under
    /// the totals block.
    pub fn total_in_words(&self) -> Result<String, InvoiceError> {
        to_invoice_words(self.totals.total_amount)
    }
}
