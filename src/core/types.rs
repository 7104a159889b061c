use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// A service invoice for TKA work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number, `PREFIX/YY/MM/NNN`.
    pub number: String,
    /// Invoice issue date; selects the numbering period.
    pub invoice_date: NaiveDate,
    /// PPN percentage, 0–100.
    pub vat_percentage: Decimal,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Invoice lines. Mutate through `Invoice::add_line` and friends so
    /// totals stay consistent.
    pub(crate) lines: Vec<InvoiceLine>,
    /// Totals derived from the lines (recomputed on every line change).
    pub totals: Totals,
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Editable; lines may be added, changed or removed.
    Draft,
    /// Issued to the customer; immutable.
    Finalized,
    /// Settled.
    Paid,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// Display name, as stored and printed.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Finalized => "Finalized",
            Self::Paid => "Paid",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// One job line on an invoice.
///
/// Lines sharing a `baris` are printed together as one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Row group key ("baris"), 1-based.
    pub baris: u32,
    /// Position within the row group, 1-based.
    pub line_order: u32,
    /// Job / catalog item name.
    pub job_name: String,
    /// Free-text description; printed only if it differs from the job name.
    pub description: Option<String>,
    /// Display name of the worker the job was done for.
    pub worker_name: Option<String>,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Price per unit, non-negative.
    pub unit_price: Decimal,
}

impl InvoiceLine {
    /// `unit_price * quantity`, unrounded.
    pub fn line_total(&self) -> Result<Decimal, InvoiceError> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                InvoiceError::InvalidArgument(format!(
                    "line (baris {}, order {}) total overflows",
                    self.baris, self.line_order
                ))
            })
    }

    /// Identity of a line within its invoice.
    pub fn key(&self) -> (u32, u32) {
        (self.baris, self.line_order)
    }
}

/// Invoice totals. All three are whole rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// `round_money(sum of line totals)`.
    pub subtotal: Decimal,
    /// `round_money(subtotal * vat_percentage / 100)`.
    pub vat_amount: Decimal,
    /// `subtotal + vat_amount`.
    pub total_amount: Decimal,
}
