#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(doc) = billeo::json::parse_document(s) {
            let _ = billeo::json::to_json(&doc);
        }
    }
});
