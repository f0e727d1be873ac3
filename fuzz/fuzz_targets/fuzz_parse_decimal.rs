#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Coercion must never panic, whatever the user types.
        let _ = billeo::core::to_number(&billeo::core::FieldValue::Text(s.to_owned()));
    }
});
