//! In-memory raw table and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about an input export file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, ...).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }
}

/// A string table with a header row.
///
/// Each row remembers its original 1-based data-row position so audits can
/// point back at the source file even after rows are exploded or filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column headers, in source order.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// Original position of each row.
    pub row_numbers: Vec<usize>,
}

impl RawTable {
    /// Create a table whose rows are numbered 1..=n.
    ///
    /// Short rows are padded and long rows truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_numbers = (1..=rows.len()).collect();
        Self::with_row_numbers(headers, rows, row_numbers)
    }

    /// Create a table with explicit row positions.
    pub fn with_row_numbers(
        headers: Vec<String>,
        mut rows: Vec<Vec<String>>,
        row_numbers: Vec<usize>,
    ) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self {
            headers,
            rows,
            row_numbers,
        }
    }

    /// Build a table from string slices; handy for tests and callers
    /// assembling small tables by hand.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Position of the first column with this exact header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Return a copy with an extra column appended.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Self {
        let mut table = self.clone();
        table.headers.push(name.to_string());
        for (row, value) in table.rows.iter_mut().zip(values) {
            row.push(value);
        }
        table
    }

    /// Return a copy with every cell passed through `f`.
    pub fn map_cells(&self, f: impl Fn(&str) -> String) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|c| f(c)).collect())
                .collect(),
            row_numbers: self.row_numbers.clone(),
        }
    }

    /// Whether a value represents a missing cell.
    pub fn is_missing(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("n/a")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_numbered_from_one_and_padded() {
        let table = RawTable::from_rows(&["A", "B"], &[&["1", "2"], &["3"]]);
        assert_eq!(table.row_numbers, vec![1, 2]);
        assert_eq!(table.get(1, 1), Some(""));
    }

    #[test]
    fn test_with_column_leaves_original_untouched() {
        let table = RawTable::from_rows(&["A"], &[&["1"], &["2"]]);
        let wider = table.with_column("B", vec!["x".into(), "y".into()]);
        assert_eq!(table.column_count(), 1);
        assert_eq!(wider.column_index("B"), Some(1));
        assert_eq!(wider.column_values(1).collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_missing_values() {
        assert!(RawTable::is_missing("  "));
        assert!(RawTable::is_missing("NaN"));
        assert!(RawTable::is_missing("N/A"));
        assert!(!RawTable::is_missing("0"));
        assert!(!RawTable::is_missing("Nancy"));
    }
}
