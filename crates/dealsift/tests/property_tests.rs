//! Property-based tests for address keys, deduplication and detection.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p dealsift --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p dealsift --test property_tests
//! ```

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use dealsift::canonical::address::{address_key, normalize_key};
use dealsift::pipeline::{verify, Deduplicator};
use dealsift::{CanonicalField, CanonicalRecord, CanonicalTable, RawTable, SchemaDetector};

// =============================================================================
// Test Strategies
// =============================================================================

const VINS: [&str; 4] = [
    "1HGCM82633A004352",
    "2T1BURHE0JC000002",
    "5YJ3E1EA7KF000003",
    "not-a-vin",
];
const STREETS: [&str; 4] = ["123 Main St", "123 MAIN ST.", "45 Oak Ave Apt 2", "PO Box 77"];
const CITIES: [&str; 2] = ["Austin", "Dallas"];

/// Street-like text with punctuation, unit tokens and PO-box variants.
fn street_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,5} [A-Za-z]{3,10} (St|Ave|Rd|Blvd)\\.?",
        "[0-9]{1,4} [A-Za-z ]{3,12} (Apt|Unit|Ste|#) ?[0-9A-Z]{1,4}",
        "(P\\.O\\. Box|PO Box|POBOX|P O Box) [0-9]{1,5}",
        "[A-Za-z0-9 .,#'\\-]{0,30}",
    ]
}

/// One generated row: (vin index, street index, city index, dated).
fn row_layout() -> impl Strategy<Value = (usize, usize, usize, bool)> {
    (0..VINS.len(), 0..STREETS.len(), 0..CITIES.len(), any::<bool>())
}

/// Records with strictly increasing dates by row number, so no two rows
/// tie on rank.
fn build_records(layout: &[(usize, usize, usize, bool)]) -> Vec<CanonicalRecord> {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    layout
        .iter()
        .enumerate()
        .map(|(i, &(vin, street, city, dated))| {
            let mut record = CanonicalRecord::new(i + 1);
            record.vin = Some(VINS[vin].to_string());
            record.address1 = Some(STREETS[street].to_string());
            record.city = Some(CITIES[city].to_string());
            record.state = Some("TX".to_string());
            record.zip = Some("73301-1234".to_string());
            if dated {
                let date = base + Duration::days(i as i64 * 3);
                record.delivery_date = Some(date.format("%Y-%m-%d").to_string());
            }
            record
        })
        .collect()
}

fn table(records: Vec<CanonicalRecord>) -> CanonicalTable {
    CanonicalTable {
        fields: CanonicalField::OUTPUT_ORDER.to_vec(),
        records,
        ..Default::default()
    }
}

fn surviving_rows(records: Vec<CanonicalRecord>) -> BTreeSet<usize> {
    Deduplicator::new()
        .run(&table(records))
        .table
        .records
        .iter()
        .map(|r| r.row_number)
        .collect()
}

// =============================================================================
// Address Keys
// =============================================================================

mod address_key_properties {
    use super::*;

    proptest! {
        #[test]
        fn normalizing_a_key_is_idempotent(
            street in street_like(),
            city in "[A-Za-z .'\\-]{0,15}",
            state in "[A-Za-z]{2}",
            zip in "[0-9]{5}(-[0-9]{4})?",
        ) {
            let key = address_key(&street, &city, &state, &zip);
            prop_assert_eq!(normalize_key(&key), key.clone());
            prop_assert_eq!(normalize_key(&normalize_key(&key)), key);
        }

        #[test]
        fn key_is_empty_or_four_parts(
            street in street_like(),
            city in "[A-Za-z ]{0,10}",
            zip in "[0-9]{0,5}",
        ) {
            let key = address_key(&street, &city, "TX", &zip);
            prop_assert!(key.is_empty() || key.split('|').count() == 4);
        }
    }
}

// =============================================================================
// Deduplication
// =============================================================================

mod dedup_properties {
    use super::*;

    proptest! {
        #[test]
        fn output_passes_verification(layout in prop::collection::vec(row_layout(), 0..40)) {
            let outcome = Deduplicator::new().run(&table(build_records(&layout)));
            let verification = verify(&outcome);
            prop_assert!(verification.passed(), "{:?}", verification.violations);
            prop_assert_eq!(outcome.table.len() + outcome.removed(), layout.len());
        }

        #[test]
        fn valid_vins_are_unique(layout in prop::collection::vec(row_layout(), 0..40)) {
            let outcome = Deduplicator::new().run(&table(build_records(&layout)));
            let mut seen = HashSet::new();
            for record in &outcome.table.records {
                if let Some(vin) = record.valid_vin() {
                    prop_assert!(seen.insert(vin));
                }
            }
        }

        #[test]
        fn output_keeps_input_order(layout in prop::collection::vec(row_layout(), 0..40)) {
            let outcome = Deduplicator::new().run(&table(build_records(&layout)));
            let rows: Vec<usize> = outcome.table.records.iter().map(|r| r.row_number).collect();
            let mut sorted = rows.clone();
            sorted.sort_unstable();
            prop_assert_eq!(rows, sorted);
        }

        #[test]
        fn survivors_do_not_depend_on_input_order(
            (records, shuffled) in prop::collection::vec(
                (0..VINS.len(), 0..STREETS.len(), 0..CITIES.len(), Just(true)),
                1..30,
            )
            .prop_flat_map(|layout| {
                let records = build_records(&layout);
                (Just(records.clone()), Just(records).prop_shuffle())
            })
        ) {
            prop_assert_eq!(surviving_rows(records), surviving_rows(shuffled));
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

mod detection_properties {
    use super::*;

    proptest! {
        #[test]
        fn detection_never_panics(
            headers in prop::collection::vec("[A-Za-z #/_]{0,12}", 1..6),
            cells in prop::collection::vec("[A-Za-z0-9 ,.#\\-/]{0,20}", 0..60),
        ) {
            let width = headers.len();
            let rows: Vec<Vec<String>> = cells.chunks(width).map(|c| c.to_vec()).collect();
            let raw = RawTable::new(headers, rows);
            let _ = SchemaDetector::new().detect(&raw);
        }

        #[test]
        fn detection_is_deterministic(
            cities in prop::collection::vec(
                prop::sample::select(vec!["Austin", "Dallas", "El Paso"]),
                1..20,
            ),
        ) {
            let rows: Vec<Vec<String>> = cities
                .iter()
                .map(|c| vec![c.to_string(), "TX".to_string(), "73301".to_string()])
                .collect();
            let raw = RawTable::new(
                vec!["City".into(), "State".into(), "Zip".into()],
                rows,
            );
            let detector = SchemaDetector::new();
            let a = detector.detect(&raw).map(|d| d.mapping.report());
            let b = detector.detect(&raw).map(|d| d.mapping.report());
            prop_assert_eq!(a.ok(), b.ok());
        }
    }
}
