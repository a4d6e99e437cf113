//! Multi-VIN list columns: one output row per valid VIN.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::inference::heuristics::is_valid_vin;
use crate::inference::{normalize_label, HeaderMatcher};
use crate::input::RawTable;
use crate::lexicon::{VIN_LIST_DELIMITERS, VIN_LIST_HEADERS};
use crate::schema::catalog::FUZZY_CANDIDATE;
use crate::schema::CanonicalField;

/// Header given to the VIN column when the table has none.
pub const VIN_HEADER: &str = "VIN";

/// Summary of a VIN explosion.
#[derive(Debug, Clone, Serialize)]
pub struct ExplosionSummary {
    /// The list column that was consumed.
    pub list_column: String,
    /// The single-VIN column values were merged into.
    pub vin_column: String,
    pub rows_in: usize,
    pub rows_out: usize,
    /// Source rows with no valid VIN at all.
    pub rows_dropped: usize,
}

/// Position of a VIN-list column, matched exactly on normalized header.
pub fn find_vin_list_column(table: &RawTable) -> Option<usize> {
    let wanted: Vec<String> = VIN_LIST_HEADERS.iter().map(|h| normalize_label(h)).collect();
    table
        .headers
        .iter()
        .position(|h| wanted.contains(&normalize_label(h)))
}

/// The best single-VIN column other than `skip`.
fn find_vin_column(table: &RawTable, matcher: &HeaderMatcher, skip: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, header) in table.headers.iter().enumerate() {
        if idx == skip {
            continue;
        }
        let score = matcher.header_score(CanonicalField::Vin, &normalize_label(header));
        if score >= FUZZY_CANDIDATE && score > best.map_or(0.0, |(_, s)| s) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Valid VINs in a list cell plus the row's single VIN, sorted and unique.
pub fn collect_vins(list_cell: &str, single: Option<&str>) -> BTreeSet<String> {
    list_cell
        .split(VIN_LIST_DELIMITERS)
        .chain(single)
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| is_valid_vin(t))
        .collect()
}

/// Expand every row into one row per valid VIN.
///
/// The list column is removed from the result. Returns `None` when the table
/// has no VIN-list column.
pub fn explode_vins(
    table: &RawTable,
    matcher: &HeaderMatcher,
) -> Option<(RawTable, ExplosionSummary)> {
    let list_col = find_vin_list_column(table)?;
    let vin_col = find_vin_column(table, matcher, list_col);

    let mut headers: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != list_col)
        .map(|(_, h)| h.clone())
        .collect();
    // position of the VIN column after the list column is removed
    let target = match vin_col {
        Some(i) if i > list_col => i - 1,
        Some(i) => i,
        None => {
            headers.push(VIN_HEADER.to_string());
            headers.len() - 1
        }
    };

    let mut rows = Vec::new();
    let mut row_numbers = Vec::new();
    let mut dropped = 0;
    for (row, &number) in table.rows.iter().zip(&table.row_numbers) {
        let single = vin_col.map(|i| row[i].as_str());
        let vins = collect_vins(&row[list_col], single);
        if vins.is_empty() {
            dropped += 1;
            continue;
        }

        let base: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != list_col)
            .map(|(_, v)| v.clone())
            .collect();
        for vin in vins {
            let mut out = base.clone();
            if target == out.len() {
                out.push(vin);
            } else {
                out[target] = vin;
            }
            rows.push(out);
            row_numbers.push(number);
        }
    }

    let summary = ExplosionSummary {
        list_column: table.headers[list_col].clone(),
        vin_column: headers[target].clone(),
        rows_in: table.row_count(),
        rows_out: rows.len(),
        rows_dropped: dropped,
    };
    log::info!(
        "VIN explosion on '{}': {} rows -> {} rows ({} without a valid VIN)",
        summary.list_column,
        summary.rows_in,
        summary.rows_out,
        summary.rows_dropped
    );

    Some((RawTable::with_row_numbers(headers, rows, row_numbers), summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "1HGCM82633A004352";
    const B: &str = "2T1BURHE0JC000002";

    #[test]
    fn test_collect_vins_filters_and_sorts() {
        let vins = collect_vins(&format!("{B}; bogus |{} / {B}", A.to_lowercase()), Some(A));
        assert_eq!(vins.into_iter().collect::<Vec<_>>(), vec![A.to_string(), B.to_string()]);
    }

    #[test]
    fn test_list_header_must_match_exactly() {
        let table = RawTable::from_rows(&["Name", "VIN List"], &[&["x", ""]]);
        assert_eq!(find_vin_list_column(&table), Some(1));
        let table = RawTable::from_rows(&["Name", "VIN List Notes"], &[&["x", ""]]);
        assert_eq!(find_vin_list_column(&table), None);
    }

    #[test]
    fn test_explode_into_existing_vin_column() {
        let both = format!("{A},{B}");
        let table = RawTable::from_rows(
            &["VINs", "Name", "VIN"],
            &[
                &[both.as_str(), "Ann", ""],
                &["junk", "Bob", ""],
                &["", "Cy", A],
            ],
        );
        let (out, summary) = explode_vins(&table, &HeaderMatcher::new()).unwrap();

        assert_eq!(out.headers, vec!["Name", "VIN"]);
        assert_eq!(out.rows, vec![
            vec!["Ann".to_string(), A.to_string()],
            vec!["Ann".to_string(), B.to_string()],
            vec!["Cy".to_string(), A.to_string()],
        ]);
        assert_eq!(out.row_numbers, vec![1, 1, 3]);
        assert_eq!(summary.rows_dropped, 1);
        assert_eq!(summary.vin_column, "VIN");
    }

    #[test]
    fn test_explode_appends_vin_column() {
        let table = RawTable::from_rows(&["Name", "VIN List"], &[&["Ann", A]]);
        let (out, _) = explode_vins(&table, &HeaderMatcher::new()).unwrap();
        assert_eq!(out.headers, vec!["Name", VIN_HEADER]);
        assert_eq!(out.rows[0][1], A);
    }

    #[test]
    fn test_no_list_column_is_none() {
        let table = RawTable::from_rows(&["VIN"], &[&[A]]);
        assert!(explode_vins(&table, &HeaderMatcher::new()).is_none());
    }
}
