//! Post-run invariant checks over the deduplicated output.

use std::collections::HashMap;

use serde::Serialize;

use super::dedup::{DedupOutcome, DropReason};

/// One invariant the output failed to hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Two output rows share a valid VIN.
    DuplicateVin { vin: String, rows: Vec<usize> },
    /// Two output rows share a non-empty address key.
    DuplicateAddress { key: String, rows: Vec<usize> },
    /// A dropped row is newer than the row kept in its place.
    NewerRowDropped {
        key: String,
        dropped_row: usize,
        kept_row: usize,
    },
    /// A VIN-pass loser is newer than a surviving row at its address.
    CrossPassSurvivor {
        key: String,
        dropped_row: usize,
        kept_row: usize,
    },
}

/// Verification result for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Verification {
    pub violations: Vec<Violation>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check the deduplicator's output.
pub fn verify(outcome: &DedupOutcome) -> Verification {
    let records = &outcome.table.records;
    let mut violations = Vec::new();

    let mut by_vin: HashMap<String, Vec<usize>> = HashMap::new();
    let mut by_address: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(vin) = record.valid_vin() {
            by_vin.entry(vin).or_default().push(i);
        }
        let key = record.address_key();
        if !key.is_empty() {
            by_address.entry(key).or_default().push(i);
        }
    }

    let row_numbers = |positions: &[usize]| {
        positions
            .iter()
            .map(|&i| records[i].row_number)
            .collect::<Vec<_>>()
    };
    let mut duplicates: Vec<Violation> = by_vin
        .iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(vin, rows)| Violation::DuplicateVin {
            vin: vin.clone(),
            rows: row_numbers(rows),
        })
        .chain(
            by_address
                .iter()
                .filter(|(_, rows)| rows.len() > 1)
                .map(|(key, rows)| Violation::DuplicateAddress {
                    key: key.clone(),
                    rows: row_numbers(rows),
                }),
        )
        .collect();
    duplicates.sort_by_key(|v| match v {
        Violation::DuplicateVin { rows, .. } | Violation::DuplicateAddress { rows, .. } => rows[0],
        _ => 0,
    });
    violations.extend(duplicates);

    let by_row: HashMap<usize, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.row_number, i))
        .collect();
    for dropped in &outcome.dropped {
        let dropped_date = dropped.record.effective_date();

        let kept = dropped
            .kept_row
            .and_then(|row| by_row.get(&row))
            .map(|&i| &records[i]);
        if let Some(kept) = kept {
            if dropped_date > kept.effective_date() {
                violations.push(Violation::NewerRowDropped {
                    key: dropped.key.clone(),
                    dropped_row: dropped.record.row_number,
                    kept_row: kept.row_number,
                });
            }
        }

        if dropped.reason != DropReason::Vin || dropped_date.is_none() {
            continue;
        }
        let key = dropped.record.address_key();
        if key.is_empty() {
            continue;
        }
        if let Some(rows) = by_address.get(&key) {
            for &i in rows {
                if dropped_date > records[i].effective_date() {
                    violations.push(Violation::CrossPassSurvivor {
                        key: key.clone(),
                        dropped_row: dropped.record.row_number,
                        kept_row: records[i].row_number,
                    });
                }
            }
        }
    }

    for violation in &violations {
        log::warn!("verification failed: {:?}", violation);
    }

    Verification { violations }
}
