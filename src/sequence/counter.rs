use serde::{Deserialize, Serialize};

use crate::core::{BillingPeriod, InvoiceNumber};

/// Persisted sequence state for one (year, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    pub year: i32,
    pub month: u32,
    /// Last issued number. Never decremented.
    pub current_number: u64,
    /// Prefix used for the last issuance.
    pub prefix: String,
}

impl SequenceCounter {
    /// Counter for the first invoice of a period.
    pub fn first(period: BillingPeriod, prefix: impl Into<String>) -> Self {
        Self {
            year: period.year,
            month: period.month,
            current_number: 1,
            prefix: prefix.into(),
        }
    }

    pub fn period(&self) -> BillingPeriod {
        BillingPeriod {
            year: self.year,
            month: self.month,
        }
    }

    /// The counter after one more issuance.
    pub fn advanced(&self, prefix: impl Into<String>) -> Self {
        Self {
            year: self.year,
            month: self.month,
            current_number: self.current_number + 1,
            prefix: prefix.into(),
        }
    }

    /// The invoice number this counter state represents.
    pub fn invoice_number(&self) -> InvoiceNumber {
        InvoiceNumber::new(self.prefix.clone(), self.period(), self.current_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_then_advanced() {
        let period = BillingPeriod::new(2024, 1).unwrap();
        let c = SequenceCounter::first(period, "FSN");
        assert_eq!(c.invoice_number().to_string(), "FSN/24/01/001");
        let c = c.advanced("FSN");
        assert_eq!(c.current_number, 2);
        assert_eq!(c.period(), period);
        assert_eq!(c.invoice_number().to_string(), "FSN/24/01/002");
    }
}
