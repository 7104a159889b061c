use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{InvoiceError, join_errors};
use super::numbering::{BillingPeriod, DEFAULT_PREFIX, InvoiceNumber, is_valid_prefix};
use super::types::*;
use super::validation::{calculate_totals, validate_invoice, validate_lines};
use super::vat::{DEFAULT_VAT_PERCENTAGE, validate_vat_percentage};

/// Builder for new draft invoices.
///
/// The number is either supplied (`build_with_number`, for imports) or
/// minted by the sequencer (`issue`, with the `sequence` feature).
///
/// ```
/// use tagihan::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
///     .vat_percentage(dec!(11))
///     .add_line(InvoiceLineBuilder::new(1, 1, "Pembuatan RPTKA", 2, dec!(750000))
///         .worker("Li Wei")
///         .build())
///     .build_with_number("FSN/24/03/007")
///     .unwrap();
///
/// assert_eq!(invoice.status, InvoiceStatus::Draft);
/// assert_eq!(invoice.totals.total_amount, dec!(1665000));
/// ```
pub struct InvoiceBuilder {
    invoice_date: NaiveDate,
    vat_percentage: Decimal,
    prefix: String,
    lines: Vec<InvoiceLine>,
}

impl InvoiceBuilder {
    /// Draft dated `invoice_date` with the default prefix and PPN.
    pub fn new(invoice_date: NaiveDate) -> Self {
        Self {
            invoice_date,
            vat_percentage: DEFAULT_VAT_PERCENTAGE,
            prefix: DEFAULT_PREFIX.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn vat_percentage(mut self, pct: Decimal) -> Self {
        self.vat_percentage = pct;
        self
    }

    /// Prefix handed to the sequencer by `issue`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn prefix_str(&self) -> &str {
        &self.prefix
    }

    /// Check everything that does not depend on the invoice number.
    ///
    /// Runs before a number is minted so a bad draft never consumes one.
    pub fn check(&self) -> Result<(), InvoiceError> {
        validate_vat_percentage(self.vat_percentage)?;
        if !is_valid_prefix(&self.prefix) {
            return Err(InvoiceError::Builder(format!(
                "prefix '{}' must be 2-5 uppercase letters",
                self.prefix
            )));
        }
        if self.lines.len() > 10_000 {
            return Err(InvoiceError::Builder(
                "invoice cannot have more than 10,000 lines".into(),
            ));
        }

        let errors = validate_lines(&self.lines);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }
        Ok(())
    }

    /// Build a draft with an externally supplied number.
    ///
    /// The number's `YY/MM` must match the invoice date.
    /// Returns all validation errors (not just the first).
    pub fn build_with_number(self, number: impl Into<String>) -> Result<Invoice, InvoiceError> {
        let number = number.into();
        let parsed: InvoiceNumber = number.parse()?;
        let period = BillingPeriod::from_date(self.invoice_date);
        if !parsed.belongs_to(period) {
            return Err(InvoiceError::Numbering(format!(
                "'{number}' does not belong to the invoice date period {period}"
            )));
        }
        self.check()?;

        let totals = calculate_totals(&self.lines, self.vat_percentage)?;
        let invoice = Invoice {
            number,
            invoice_date: self.invoice_date,
            vat_percentage: self.vat_percentage,
            status: InvoiceStatus::Draft,
            lines: self.lines,
            totals,
        };

        let errors = validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }

        Ok(invoice)
    }
}

/// Builder for InvoiceLine.
pub struct InvoiceLineBuilder {
    baris: u32,
    line_order: u32,
    job_name: String,
    quantity: u32,
    unit_price: Decimal,
    description: Option<String>,
    worker_name: Option<String>,
}

impl InvoiceLineBuilder {
    pub fn new(
        baris: u32,
        line_order: u32,
        job_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            baris,
            line_order,
            job_name: job_name.into(),
            quantity,
            unit_price,
            description: None,
            worker_name: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn worker(mut self, name: impl Into<String>) -> Self {
        self.worker_name = Some(name.into());
        self
    }

    pub fn build(self) -> InvoiceLine {
        InvoiceLine {
            baris: self.baris,
            line_order: self.line_order,
            job_name: self.job_name,
            description: self.description,
            worker_name: self.worker_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn defaults_to_eleven_percent() {
        let inv = InvoiceBuilder::new(date())
            .add_line(InvoiceLineBuilder::new(1, 1, "Visa", 1, dec!(1000)).build())
            .build_with_number("FSN/24/01/001")
            .unwrap();
        assert_eq!(inv.vat_percentage, dec!(11));
        assert_eq!(inv.totals.vat_amount, dec!(110));
    }

    #[test]
    fn empty_draft_is_allowed() {
        let inv = InvoiceBuilder::new(date()).build_with_number("FSN/24/01/002").unwrap();
        assert!(inv.lines().is_empty());
        assert_eq!(inv.totals, Totals::default());
    }

    #[test]
    fn bad_number_rejected() {
        let err = InvoiceBuilder::new(date()).build_with_number("RE-2024-001");
        assert!(matches!(err, Err(InvoiceError::Numbering(_))));
    }

    #[test]
    fn number_must_match_invoice_date() {
        for number in ["FSN/23/05/001", "FSN/24/02/001", "FSN/25/01/001"] {
            let err = InvoiceBuilder::new(date()).build_with_number(number);
            assert!(matches!(err, Err(InvoiceError::Numbering(_))), "{number}");
        }
        assert!(InvoiceBuilder::new(date()).build_with_number("TKA/24/01/042").is_ok());
    }

    #[test]
    fn bad_vat_rejected() {
        let err = InvoiceBuilder::new(date())
            .vat_percentage(dec!(101))
            .build_with_number("FSN/24/01/001");
        assert!(matches!(err, Err(InvoiceError::InvalidArgument(_))));
    }

    #[test]
    fn bad_prefix_rejected() {
        let builder = InvoiceBuilder::new(date()).prefix("fsn");
        assert!(matches!(builder.check(), Err(InvoiceError::Builder(_))));
    }

    #[test]
    fn invalid_lines_reported_together() {
        let err = InvoiceBuilder::new(date())
            .add_line(InvoiceLineBuilder::new(0, 1, "Visa", 1, dec!(1)).build())
            .add_line(InvoiceLineBuilder::new(1, 1, "", 1, dec!(1)).build())
            .build_with_number("FSN/24/01/001")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("LINE-BARIS"), "{msg}");
        assert!(msg.contains("LINE-JOB"), "{msg}");
    }

    #[test]
    fn duplicate_lines_rejected() {
        let err = InvoiceBuilder::new(date())
            .add_line(InvoiceLineBuilder::new(1, 1, "Visa", 1, dec!(1)).build())
            .add_line(InvoiceLineBuilder::new(1, 1, "KITAS", 1, dec!(1)).build())
            .build_with_number("FSN/24/01/001")
            .unwrap_err();
        assert!(err.to_string().contains("LINE-DUP"));
    }
}
