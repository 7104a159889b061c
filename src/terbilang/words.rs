use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::{InvoiceError, round_money};

/// Currency word appended by [`to_invoice_words`].
pub const CURRENCY_WORD: &str = "Rupiah";

/// Largest magnitude that can be spelled.
pub const MAX_SUPPORTED: u64 = 999_999_999_999_999;

const ZERO: &str = "Nol";
const MINUS: &str = "Minus";

/// 0–19. Index 0 is never emitted.
const SMALL: [&str; 20] = [
    "",
    "Satu",
    "Dua",
    "Tiga",
    "Empat",
    "Lima",
    "Enam",
    "Tujuh",
    "Delapan",
    "Sembilan",
    "Sepuluh",
    "Sebelas",
    "Dua Belas",
    "Tiga Belas",
    "Empat Belas",
    "Lima Belas",
    "Enam Belas",
    "Tujuh Belas",
    "Delapan Belas",
    "Sembilan Belas",
];

/// 20, 30, …, 90 indexed by the tens digit.
const TENS: [&str; 10] = [
    "",
    "",
    "Dua Puluh",
    "Tiga Puluh",
    "Empat Puluh",
    "Lima Puluh",
    "Enam Puluh",
    "Tujuh Puluh",
    "Delapan Puluh",
    "Sembilan Puluh",
];

struct Scale {
    threshold: u64,
    word: &'static str,
    /// Contracted form used when the multiplier is exactly one.
    single: Option<&'static str>,
}

/// Descending magnitude groups.
const SCALES: [Scale; 5] = [
    Scale {
        threshold: 1_000_000_000_000,
        word: "Triliun",
        single: None,
    },
    Scale {
        threshold: 1_000_000_000,
        word: "Miliar",
        single: None,
    },
    Scale {
        threshold: 1_000_000,
        word: "Juta",
        single: None,
    },
    Scale {
        threshold: 1_000,
        word: "Ribu",
        single: Some("Seribu"),
    },
    Scale {
        threshold: 100,
        word: "Ratus",
        single: Some("Seratus"),
    },
];

/// Spell an amount in Indonesian, e.g. `25_000_000 → "Dua Puluh Lima Juta"`.
///
/// The amount is rounded with the invoice rounding rule and truncated to a
/// whole number first. Negative amounts get a leading "Minus".
pub fn to_words(amount: Decimal) -> Result<String, InvoiceError> {
    if amount.is_zero() {
        return Ok(ZERO.to_string());
    }

    let whole = round_money(amount).trunc();
    let magnitude = whole
        .abs()
        .to_u64()
        .filter(|n| *n <= MAX_SUPPORTED)
        .ok_or(InvoiceError::AmountOutOfRange(amount))?;

    if magnitude == 0 {
        return Ok(ZERO.to_string());
    }

    let mut parts = Vec::new();
    if whole.is_sign_negative() {
        parts.push(MINUS);
    }
    spell(magnitude, &mut parts);
    Ok(parts.join(" "))
}

/// [`to_words`] followed by `unit`, e.g. `"Seribu Rupiah"`.
pub fn to_words_with_unit(amount: Decimal, unit: &str) -> Result<String, InvoiceError> {
    Ok(format!("{} {unit}", to_words(amount)?))
}

/// Amount in words with the rupiah currency word.
pub fn to_invoice_words(amount: Decimal) -> Result<String, InvoiceError> {
    to_words_with_unit(amount, CURRENCY_WORD)
}

fn spell(n: u64, out: &mut Vec<&'static str>) {
    if n == 0 {
        return;
    }

    for scale in &SCALES {
        if n >= scale.threshold {
            let multiplier = n / scale.threshold;
            match scale.single {
                Some(single) if multiplier == 1 => out.push(single),
                _ => {
                    spell(multiplier, out);
                    out.push(scale.word);
                }
            }
            spell(n % scale.threshold, out);
            return;
        }
    }

    if n < 20 {
        out.push(SMALL[n as usize]);
    } else {
        out.push(TENS[(n / 10) as usize]);
        spell(n % 10, out);
    }
}
