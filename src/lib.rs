//! # tagihan
//!
//! Invoice computation engine for billing contracted foreign workers (TKA):
//! the custom rupiah rounding rule, PPN (VAT), Indonesian amount-in-words
//! ("terbilang"), gapless per-month invoice numbering and the row grouping
//! used by printed and PDF invoices.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tagihan::core::*;
//!
//! let invoice = InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
//!     .add_line(InvoiceLineBuilder::new(1, 1, "Perpanjangan KITAS", 1, dec!(100000)).build())
//!     .add_line(InvoiceLineBuilder::new(1, 2, "Biaya IMTA", 1, dec!(250000.50)).build())
//!     .add_line(InvoiceLineBuilder::new(2, 1, "Biaya Notifikasi", 1, dec!(50000)).build())
//!     .build_with_number("FSN/24/01/001")
//!     .unwrap();
//!
//! assert_eq!(invoice.totals.subtotal, dec!(400001));
//! assert_eq!(invoice.totals.vat_amount, dec!(44000));
//! assert_eq!(invoice.totals.total_amount, dec!(444001));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice types, rounding, PPN, lifecycle, number format |
//! | `terbilang` | Indonesian amount-in-words |
//! | `sequence` | Atomic per-month invoice number sequencer, stores, cache |
//! | `render` | Row grouping and table rows for PDF/print renderers |
//! | `settings` | TOML-backed settings |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "terbilang")]
pub mod terbilang;

#[cfg(feature = "sequence")]
pub mod sequence;

#[cfg(feature = "render")]
pub mod render;

#[cfg(feature = "settings")]
pub mod settings;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
