//! PPN (Pajak Pertambahan Nilai), the Indonesian VAT.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::InvoiceError;
use super::rounding::round_money;

/// Default PPN percentage applied to new invoices.
pub const DEFAULT_VAT_PERCENTAGE: Decimal = dec!(11.00);

const MAX_VAT_PERCENTAGE: Decimal = dec!(100);

/// Check that a VAT percentage lies within `[0, 100]`.
pub fn validate_vat_percentage(vat_percentage: Decimal) -> Result<(), InvoiceError> {
    if vat_percentage < Decimal::ZERO || vat_percentage > MAX_VAT_PERCENTAGE {
        return Err(InvoiceError::InvalidArgument(format!(
            "VAT percentage {vat_percentage} must be between 0 and 100"
        )));
    }
    Ok(())
}

/// VAT on an already-rounded subtotal: `round_money(subtotal * pct / 100)`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tagihan::core::calculate_vat;
///
/// assert_eq!(calculate_vat(dec!(400001), dec!(11)).unwrap(), dec!(44000));
/// ```
pub fn calculate_vat(subtotal: Decimal, vat_percentage: Decimal) -> Result<Decimal, InvoiceError> {
    validate_vat_percentage(vat_percentage)?;
    let gross = subtotal
        .checked_mul(vat_percentage)
        .ok_or_else(|| overflow(subtotal))?;
    Ok(round_money(gross / dec!(100)))
}

/// `subtotal + calculate_vat(subtotal, vat_percentage)`.
pub fn calculate_total(
    subtotal: Decimal,
    vat_percentage: Decimal,
) -> Result<Decimal, InvoiceError> {
    let vat = calculate_vat(subtotal, vat_percentage)?;
    subtotal.checked_add(vat).ok_or_else(|| overflow(subtotal))
}

fn overflow(subtotal: Decimal) -> InvoiceError {
    InvoiceError::InvalidArgument(format!("subtotal {subtotal} is too large for PPN"))
}
