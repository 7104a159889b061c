#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|input: (i64, u32)| {
    let (mantissa, scale) = input;
    let Ok(amount) = Decimal::try_from_i128_with_scale(i128::from(mantissa), scale % 29) else {
        return;
    };
    // Out-of-range amounts must be rejected, never panic.
    let _ = tagihan::terbilang::to_words(amount);
    let _ = tagihan::core::round_money(amount);
});
