//! Fuzz target for the City/State/Zip splitter.

#![no_main]

use dealsift::inference::composite::split_csz_value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let parts = split_csz_value(text);
        // A zip is either absent or five digits
        assert!(parts.zip.is_empty() || parts.zip.chars().count() == 5);
    }
});
