use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::{InvoiceError, ValidationError};
use super::numbering::{BillingPeriod, InvoiceNumber};
use super::rounding::round_money;
use super::types::*;
use super::vat::{calculate_vat, validate_vat_percentage};

/// Compute totals for a set of lines at the given PPN percentage.
///
/// The line sum is rounded before VAT is applied.
pub fn calculate_totals(
    lines: &[InvoiceLine],
    vat_percentage: Decimal,
) -> Result<Totals, InvoiceError> {
    let line_sum = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.line_total()?)
            .ok_or_else(|| InvoiceError::InvalidArgument("sum of line totals overflows".into()))
    })?;
    let subtotal = round_money(line_sum);
    let vat_amount = calculate_vat(subtotal, vat_percentage)?;
    let total_amount = subtotal
        .checked_add(vat_amount)
        .ok_or_else(|| InvoiceError::InvalidArgument("invoice total overflows".into()))?;
    Ok(Totals {
        subtotal,
        vat_amount,
        total_amount,
    })
}

/// Validate a single line. `field` is the path prefix used in errors.
pub fn validate_line(line: &InvoiceLine, field: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if line.baris == 0 {
        errors.push(ValidationError::with_rule(
            format!("{field}.baris"),
            "row number (baris) must be at least 1",
            "LINE-BARIS",
        ));
    }
    if line.line_order == 0 {
        errors.push(ValidationError::with_rule(
            format!("{field}.line_order"),
            "line order must be at least 1",
            "LINE-ORDER",
        ));
    }
    if line.quantity == 0 {
        errors.push(ValidationError::with_rule(
            format!("{field}.quantity"),
            "quantity must be at least 1",
            "LINE-QTY",
        ));
    }
    if line.unit_price < Decimal::ZERO {
        errors.push(ValidationError::with_rule(
            format!("{field}.unit_price"),
            format!("unit price {} must not be negative", line.unit_price),
            "LINE-PRICE",
        ));
    }
    if line.line_total().is_err() {
        errors.push(ValidationError::with_rule(
            format!("{field}.unit_price"),
            format!("unit price {} times quantity {} overflows", line.unit_price, line.quantity),
            "LINE-TOTAL",
        ));
    }
    if line.job_name.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{field}.job_name"),
            "job name must not be empty",
            "LINE-JOB",
        ));
    }

    errors
}

/// Validate every line and reject duplicate `(baris, line_order)` keys.
pub fn validate_lines(lines: &[InvoiceLine]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (i, line) in lines.iter().enumerate() {
        let field = format!("lines[{i}]");
        errors.extend(validate_line(line, &field));
        if !seen.insert(line.key()) {
            errors.push(ValidationError::with_rule(
                field,
                format!(
                    "duplicate line (baris {}, order {})",
                    line.baris, line.line_order
                ),
                "LINE-DUP",
            ));
        }
    }
    errors
}

/// Validate an invoice. Returns all validation errors found (not just the first).
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match invoice.number.parse::<InvoiceNumber>() {
        Ok(number) => {
            let period = BillingPeriod::from_date(invoice.invoice_date);
            if !number.belongs_to(period) {
                errors.push(ValidationError::with_rule(
                    "number",
                    format!(
                        "'{}' does not belong to the invoice date period {period}",
                        invoice.number
                    ),
                    "INV-PERIOD",
                ));
            }
        }
        Err(_) => errors.push(ValidationError::with_rule(
            "number",
            format!("'{}' is not a PREFIX/YY/MM/NNN invoice number", invoice.number),
            "INV-NUMBER",
        )),
    }

    if let Err(e) = validate_vat_percentage(invoice.vat_percentage) {
        errors.push(ValidationError::with_rule(
            "vat_percentage",
            e.to_string(),
            "INV-VAT",
        ));
    }

    errors.extend(validate_lines(&invoice.lines));

    if invoice.status != InvoiceStatus::Draft
        && invoice.status != InvoiceStatus::Cancelled
        && invoice.lines.is_empty()
    {
        errors.push(ValidationError::with_rule(
            "lines",
            "a finalized invoice must have at least one line",
            "INV-LINES",
        ));
    }

    // Arithmetic check only makes sense with a usable VAT percentage.
    if let Ok(expected) = calculate_totals(&invoice.lines, invoice.vat_percentage) {
        if expected != invoice.totals {
            errors.push(ValidationError::with_rule(
                "totals",
                format!(
                    "totals {}/{}/{} do not match lines (expected {}/{}/{})",
                    invoice.totals.subtotal,
                    invoice.totals.vat_amount,
                    invoice.totals.total_amount,
                    expected.subtotal,
                    expected.vat_amount,
                    expected.total_amount
                ),
                "INV-TOTALS",
            ));
        }
    }

    errors
}
