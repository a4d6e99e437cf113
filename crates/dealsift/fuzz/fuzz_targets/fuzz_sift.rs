//! Fuzz target for a whole in-memory run.
//!
//! Detection may reject the table, but no stage may panic.

#![no_main]

use chrono::NaiveDate;
use dealsift::{RawTable, Sifter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzzed content as the cells of a typical export
        let headers = ["Last Name", "Address", "City", "State", "Zip", "VIN", "Sold Date"];
        let rows: Vec<Vec<String>> = content
            .lines()
            .take(200)
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();
        let table = RawTable::new(headers.iter().map(|h| h.to_string()).collect(), rows);

        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        let _ = Sifter::new().with_today(today).sift_table(&table);
    }
});
