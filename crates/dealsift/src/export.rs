//! CSV and JSON writers for run outputs.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::canonical::{CanonicalRecord, CanonicalTable};
use crate::error::{Result, SiftError};
use crate::pipeline::{DroppedRow, RunReport};
use crate::sifter::SiftResult;

/// Header of the original row-position column in audit files.
pub const ROW_COLUMN: &str = "Source_Row";

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| SiftError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open a CSV writer on a file, or stdout for `None` and `-`.
pub fn open_csv_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(create(p)?),
        _ => Box::new(std::io::stdout()),
    };
    Ok(csv::WriterBuilder::new().from_writer(sink))
}

/// Write the output columns of a table.
pub fn write_table<W: Write>(table: &CanonicalTable, writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record(table.headers())?;
    for record in &table.records {
        writer.write_record(table.row_values(record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a table to a CSV file, or stdout for `None` and `-`.
pub fn write_csv(table: &CanonicalTable, path: Option<&Path>) -> Result<()> {
    let mut writer = open_csv_writer(path)?;
    write_table(table, &mut writer)
}

/// Row position, output cells, then the unmapped source cells.
fn audit_row(table: &CanonicalTable, record: &CanonicalRecord) -> Vec<String> {
    let mut row = vec![record.row_number.to_string()];
    row.extend(table.row_values(record).into_iter().map(str::to_string));
    row.extend(
        table
            .extra_headers
            .iter()
            .map(|h| record.extras.get(h).cloned().unwrap_or_default()),
    );
    row
}

fn audit_headers(table: &CanonicalTable, leading: &[&str]) -> Vec<String> {
    let mut headers = vec![ROW_COLUMN.to_string()];
    headers.extend(leading.iter().map(|h| h.to_string()));
    headers.extend(table.headers().into_iter().map(str::to_string));
    headers.extend(table.extra_headers.iter().cloned());
    headers
}

/// Write rows removed by a filter stage.
pub fn write_removed(path: &Path, table: &CanonicalTable, rows: &[CanonicalRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(create(path)?);
    writer.write_record(audit_headers(table, &[]))?;
    for record in rows {
        writer.write_record(audit_row(table, record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write rows removed by the deduplicator with their reason and survivor.
pub fn write_duplicates(path: &Path, table: &CanonicalTable, rows: &[DroppedRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(create(path)?);
    writer.write_record(audit_headers(table, &["Reason", "Key", "Kept_Row"]))?;
    for dropped in rows {
        let base = audit_row(table, &dropped.record);
        let mut row = vec![base[0].clone()];
        row.push(dropped.reason.as_str().to_string());
        row.push(dropped.key.clone());
        row.push(dropped.kept_row.map(|r| r.to_string()).unwrap_or_default());
        row.extend(base.into_iter().skip(1));
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write every audit file for a run into `dir`, named after `stem`.
///
/// Returns the paths written. Stages that removed nothing get no file.
pub fn write_audits(dir: &Path, stem: &str, result: &SiftResult) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| SiftError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::new();
    for removal in &result.removed {
        let path = dir.join(format!("{stem}_removed_{}.csv", removal.stage));
        write_removed(&path, &result.table, &removal.rows)?;
        written.push(path);
    }
    if !result.duplicates.is_empty() {
        let path = dir.join(format!("{stem}_duplicates.csv"));
        write_duplicates(&path, &result.table, &result.duplicates)?;
        written.push(path);
    }
    Ok(written)
}

/// Write the run report as pretty JSON.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, report)?;
    out.flush().map_err(|e| SiftError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
