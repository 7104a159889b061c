use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Prefix used when the caller does not pick one.
pub const DEFAULT_PREFIX: &str = "FSN";

/// Minimum zero-padding of the sequence part ("001").
const SEQUENCE_PAD: usize = 3;

/// Calendar month an invoice number sequence is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    /// Period for `year`/`month`; `month` must be 1–12.
    pub fn new(year: i32, month: u32) -> Result<Self, InvoiceError> {
        if !(1..=12).contains(&month) {
            return Err(InvoiceError::InvalidArgument(format!(
                "month {month} must be between 1 and 12"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period an invoice dated `date` belongs to.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Last two digits of the year, as printed in invoice numbers.
    pub fn short_year(&self) -> u32 {
        self.year.rem_euclid(100) as u32
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A parsed invoice number: `PREFIX/YY/MM/NNN`, e.g. `FSN/24/01/001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceNumber {
    pub prefix: String,
    /// Two-digit year (0–99).
    pub year: u32,
    pub month: u32,
    pub sequence: u64,
}

impl InvoiceNumber {
    /// Compose the number issued as `sequence` within `period`.
    pub fn new(prefix: impl Into<String>, period: BillingPeriod, sequence: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year: period.short_year(),
            month: period.month,
            sequence,
        }
    }

    /// True if the number's `YY/MM` part names `period`.
    pub fn belongs_to(&self, period: BillingPeriod) -> bool {
        self.year == period.short_year() && self.month == period.month
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:02}/{:02}/{:0>width$}",
            self.prefix,
            self.year,
            self.month,
            self.sequence,
            width = SEQUENCE_PAD
        )
    }
}

impl FromStr for InvoiceNumber {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InvoiceError::Numbering(format!("invalid invoice number '{s}': {reason}"));

        let parts: Vec<&str> = s.split('/').collect();
        let [prefix, year, month, sequence] = parts.as_slice() else {
            return Err(invalid("expected PREFIX/YY/MM/NNN"));
        };

        if !is_valid_prefix(prefix) {
            return Err(invalid("prefix must be 2-5 uppercase letters"));
        }
        if year.len() != 2 || !all_digits(year) {
            return Err(invalid("year must be 2 digits"));
        }
        if month.len() != 2 || !all_digits(month) {
            return Err(invalid("month must be 2 digits"));
        }
        if !(3..=4).contains(&sequence.len()) || !all_digits(sequence) {
            return Err(invalid("sequence must be 3 or 4 digits"));
        }

        let month: u32 = month.parse().map_err(|_| invalid("month"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 01 and 12"));
        }

        Ok(Self {
            prefix: (*prefix).to_string(),
            year: year.parse().map_err(|_| invalid("year"))?,
            month,
            sequence: sequence.parse().map_err(|_| invalid("sequence"))?,
        })
    }
}

/// Check a string against the persisted invoice number format
/// (`^[A-Z]{2,5}/\d{2}/\d{2}/\d{3,4}$`, month 01–12).
pub fn is_valid_invoice_number(s: &str) -> bool {
    s.parse::<InvoiceNumber>().is_ok()
}

/// 2 to 5 uppercase ASCII letters.
pub fn is_valid_prefix(prefix: &str) -> bool {
    (2..=5).contains(&prefix.len()) && prefix.bytes().all(|b| b.is_ascii_uppercase())
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
