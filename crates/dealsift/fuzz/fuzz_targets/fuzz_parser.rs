//! Fuzz target for the export parser.
//!
//! The parser must never panic on malformed input, whatever delimiter it
//! settles on.

#![no_main]

use dealsift::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Parser::new().parse_str(text);
    }
});
