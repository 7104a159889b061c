#![no_main]

use libfuzzer_sys::fuzz_target;
use tagihan::core::InvoiceNumber;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // "FSN/24/01/0001" prints back as "FSN/24/01/001", so compare parsed values.
        if let Ok(number) = s.parse::<InvoiceNumber>() {
            let reparsed: InvoiceNumber = number.to_string().parse().expect("printed number must parse");
            assert_eq!(reparsed, number);
        }
    }
});
