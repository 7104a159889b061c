use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Format an amount the Indonesian way: `Rp 1.234.567`.
///
/// Sen are shown (`Rp 250.000,50`) only when the amount, rounded to two
/// places, is not whole. Negative amounts are written `-Rp 1.000`.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let abs = rounded.abs();

    let whole = abs.trunc();
    let digits = whole.to_string();
    let digits = digits.split('.').next().unwrap_or("0");
    let cents = ((abs - whole) * dec!(100)).to_u32().unwrap_or(0);

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str("Rp ");
    out.push_str(&group_thousands(digits));
    if cents != 0 {
        out.push_str(&format!(",{cents:02}"));
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
