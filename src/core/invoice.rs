use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::{InvoiceError, join_errors};
use super::types::*;
use super::validation::{calculate_totals, validate_line};
use super::vat::validate_vat_percentage;

impl Invoice {
    /// Lines in insertion order.
    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn is_editable(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    /// Append a line. Draft only; `(baris, line_order)` must be unused.
    pub fn add_line(&mut self, line: InvoiceLine) -> Result<(), InvoiceError> {
        self.ensure_editable("add a line")?;
        check_line(&line)?;
        if self.position(line.baris, line.line_order).is_some() {
            return Err(InvoiceError::InvalidArgument(format!(
                "line (baris {}, order {}) already exists",
                line.baris, line.line_order
            )));
        }
        self.lines.push(line);
        if let Err(e) = self.recalculate() {
            self.lines.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Replace the line at `(baris, line_order)`, e.g. after a price,
    /// quantity or job change. The replacement may move to a new key.
    pub fn replace_line(
        &mut self,
        baris: u32,
        line_order: u32,
        line: InvoiceLine,
    ) -> Result<(), InvoiceError> {
        self.ensure_editable("change a line")?;
        check_line(&line)?;
        let idx = self.position(baris, line_order).ok_or_else(|| missing(baris, line_order))?;
        if line.key() != (baris, line_order) && self.position(line.baris, line.line_order).is_some()
        {
            return Err(InvoiceError::InvalidArgument(format!(
                "line (baris {}, order {}) already exists",
                line.baris, line.line_order
            )));
        }
        let previous = std::mem::replace(&mut self.lines[idx], line);
        if let Err(e) = self.recalculate() {
            self.lines[idx] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Remove and return the line at `(baris, line_order)`.
    pub fn remove_line(
        &mut self,
        baris: u32,
        line_order: u32,
    ) -> Result<InvoiceLine, InvoiceError> {
        self.ensure_editable("remove a line")?;
        let idx = self.position(baris, line_order).ok_or_else(|| missing(baris, line_order))?;
        let removed = self.lines.remove(idx);
        self.recalculate()?;
        Ok(removed)
    }

    /// Change the PPN percentage of a draft.
    pub fn set_vat_percentage(&mut self, vat_percentage: Decimal) -> Result<(), InvoiceError> {
        self.ensure_editable("change the VAT percentage")?;
        validate_vat_percentage(vat_percentage)?;
        let previous = std::mem::replace(&mut self.vat_percentage, vat_percentage);
        if let Err(e) = self.recalculate() {
            self.vat_percentage = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Recompute `totals` from the current lines.
    pub fn recalculate(&mut self) -> Result<(), InvoiceError> {
        self.totals = calculate_totals(&self.lines, self.vat_percentage)?;
        debug!(
            number = %self.number,
            subtotal = %self.totals.subtotal,
            vat = %self.totals.vat_amount,
            total = %self.totals.total_amount,
            "invoice totals recalculated"
        );
        Ok(())
    }

    /// Draft → Finalized. Needs at least one line and a valid VAT percentage.
    pub fn finalize(&mut self) -> Result<(), InvoiceError> {
        if self.status != InvoiceStatus::Draft {
            return Err(self.bad_transition(InvoiceStatus::Finalized));
        }
        if self.lines.is_empty() {
            return Err(InvoiceError::InvalidState(format!(
                "invoice {} has no lines and cannot be finalized",
                self.number
            )));
        }
        validate_vat_percentage(self.vat_percentage)?;
        self.recalculate()?;
        self.transition(InvoiceStatus::Finalized);
        Ok(())
    }

    /// Finalized → Paid.
    pub fn mark_paid(&mut self) -> Result<(), InvoiceError> {
        if self.status != InvoiceStatus::Finalized {
            return Err(self.bad_transition(InvoiceStatus::Paid));
        }
        self.transition(InvoiceStatus::Paid);
        Ok(())
    }

    /// Any status except Paid → Cancelled. Cancelling twice is a no-op.
    pub fn cancel(&mut self) -> Result<(), InvoiceError> {
        match self.status {
            InvoiceStatus::Paid => Err(self.bad_transition(InvoiceStatus::Cancelled)),
            InvoiceStatus::Cancelled => Ok(()),
            InvoiceStatus::Draft | InvoiceStatus::Finalized => {
                self.transition(InvoiceStatus::Cancelled);
                Ok(())
            }
        }
    }

    fn transition(&mut self, to: InvoiceStatus) {
        info!(
            number = %self.number,
            from = self.status.label(),
            to = to.label(),
            "invoice status changed"
        );
        self.status = to;
    }

    fn bad_transition(&self, to: InvoiceStatus) -> InvoiceError {
        InvoiceError::InvalidState(format!(
            "invoice {} cannot move from {} to {}",
            self.number,
            self.status.label(),
            to.label()
        ))
    }

    fn ensure_editable(&self, action: &str) -> Result<(), InvoiceError> {
        if !self.is_editable() {
            return Err(InvoiceError::InvalidState(format!(
                "cannot {action} on invoice {} in status {}",
                self.number,
                self.status.label()
            )));
        }
        Ok(())
    }

    fn position(&self, baris: u32, line_order: u32) -> Option<usize> {
        self.lines.iter().position(|l| l.key() == (baris, line_order))
    }
}

fn check_line(line: &InvoiceLine) -> Result<(), InvoiceError> {
    let errors = validate_line(line, "line");
    if errors.is_empty() {
        Ok(())
    } else {
        Err(join_errors(&errors))
    }
}

fn missing(baris: u32, line_order: u32) -> InvoiceError {
    InvoiceError::InvalidArgument(format!("no line (baris {baris}, order {line_order})"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::core::InvoiceLineBuilder;

    fn draft() -> Invoice {
        Invoice {
            number: "FSN/24/01/001".into(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            vat_percentage: dec!(11),
            status: InvoiceStatus::Draft,
            lines: Vec::new(),
            totals: Totals::default(),
        }
    }

    fn job(baris: u32, order: u32, price: Decimal) -> InvoiceLine {
        InvoiceLineBuilder::new(baris, order, "Biaya IMTA", 1, price).build()
    }

    #[test]
    fn adding_lines_updates_totals() {
        let mut inv = draft();
        inv.add_line(job(1, 1, dec!(100000))).unwrap();
        inv.add_line(job(1, 2, dec!(250000.50))).unwrap();
        assert_eq!(inv.totals.subtotal, dec!(350001));
        inv.add_line(job(2, 1, dec!(50000))).unwrap();
        assert_eq!(inv.totals.total_amount, dec!(444001));
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut inv = draft();
        inv.add_line(job(1, 1, dec!(1))).unwrap();
        assert!(matches!(
            inv.add_line(job(1, 1, dec!(2))),
            Err(InvoiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_baris_rejected_at_creation() {
        let mut inv = draft();
        assert!(matches!(
            inv.add_line(job(0, 1, dec!(1))),
            Err(InvoiceError::Validation(_))
        ));
        assert!(inv.lines().is_empty());
    }

    #[test]
    fn replace_and_remove() {
        let mut inv = draft();
        inv.add_line(job(1, 1, dec!(1000))).unwrap();
        inv.add_line(job(1, 2, dec!(2000))).unwrap();

        let mut changed = job(1, 2, dec!(3000));
        changed.quantity = 2;
        inv.replace_line(1, 2, changed).unwrap();
        assert_eq!(inv.totals.subtotal, dec!(7000));

        // moving onto an occupied key is refused
        assert!(inv.replace_line(1, 2, job(1, 1, dec!(5))).is_err());

        let removed = inv.remove_line(1, 1).unwrap();
        assert_eq!(removed.unit_price, dec!(1000));
        assert_eq!(inv.totals.subtotal, dec!(6000));
        assert!(inv.remove_line(9, 9).is_err());
    }

    #[test]
    fn overflowing_line_leaves_invoice_unchanged() {
        let mut inv = draft();
        inv.set_vat_percentage(Decimal::ZERO).unwrap();
        inv.add_line(job(1, 1, Decimal::MAX)).unwrap();
        let before = inv.totals;

        assert!(matches!(
            inv.add_line(job(1, 2, Decimal::MAX)),
            Err(InvoiceError::InvalidArgument(_))
        ));
        assert_eq!(inv.lines().len(), 1);
        assert_eq!(inv.totals, before);

        let mut doubled = job(1, 1, Decimal::MAX);
        doubled.quantity = 2;
        assert!(matches!(
            inv.replace_line(1, 1, doubled),
            Err(InvoiceError::Validation(_))
        ));
        assert_eq!(inv.lines()[0].quantity, 1);

        assert!(inv.set_vat_percentage(dec!(11)).is_err());
        assert_eq!(inv.vat_percentage, Decimal::ZERO);
        assert_eq!(inv.totals, before);
    }

    #[test]
    fn finalize_requires_lines() {
        let mut inv = draft();
        assert!(matches!(inv.finalize(), Err(InvoiceError::InvalidState(_))));
        inv.add_line(job(1, 1, dec!(1))).unwrap();
        inv.finalize().unwrap();
        assert_eq!(inv.status, InvoiceStatus::Finalized);
    }

    #[test]
    fn finalize_rejects_invalid_vat() {
        let mut inv = draft();
        inv.add_line(job(1, 1, dec!(1))).unwrap();
        inv.vat_percentage = dec!(150);
        assert!(matches!(inv.finalize(), Err(InvoiceError::InvalidArgument(_))));
        assert_eq!(inv.status, InvoiceStatus::Draft);
        assert_eq!(inv.vat_percentage, dec!(150));
    }

    #[test]
    fn finalized_invoice_is_immutable() {
        let mut inv = draft();
        inv.add_line(job(1, 1, dec!(1))).unwrap();
        inv.finalize().unwrap();
        assert!(matches!(inv.add_line(job(2, 1, dec!(1))), Err(InvoiceError::InvalidState(_))));
        assert!(inv.remove_line(1, 1).is_err());
        assert!(inv.set_vat_percentage(dec!(12)).is_err());
        assert!(inv.finalize().is_err());
    }

    #[test]
    fn paid_requires_finalized_and_blocks_cancel() {
        let mut inv = draft();
        assert!(inv.mark_paid().is_err());
        inv.add_line(job(1, 1, dec!(1))).unwrap();
        inv.finalize().unwrap();
        inv.mark_paid().unwrap();
        assert!(matches!(inv.cancel(), Err(InvoiceError::InvalidState(_))));
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn cancel_from_draft_and_finalized() {
        let mut a = draft();
        a.cancel().unwrap();
        assert_eq!(a.status, InvoiceStatus::Cancelled);
        a.cancel().unwrap();

        let mut b = draft();
        b.add_line(job(1, 1, dec!(1))).unwrap();
        b.finalize().unwrap();
        b.cancel().unwrap();
        assert_eq!(b.status, InvoiceStatus::Cancelled);
        assert!(b.mark_paid().is_err());
    }
}
