//! Main Sifter struct: one export in, one clean contact list out.

use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::canonical::{clean_cells, explode_vins, CanonicalTable, Canonicalizer, ExplosionSummary};
use crate::error::{Result, SiftError};
use crate::inference::{Detection, SchemaDetector};
use crate::input::{Parser, ParserConfig, RawTable};
use crate::pipeline::{
    verify, DedupCounts, Deduplicator, DroppedRow, FilterPipeline, PipelineConfig, RunReport,
    StageRemoval, StageReport,
};
use crate::schema::FieldMapping;

/// Result of sifting one table.
#[derive(Debug, Clone)]
pub struct SiftResult {
    /// Final rows in locked output order.
    pub table: CanonicalTable,
    pub mapping: FieldMapping,
    pub report: RunReport,
    /// Rows removed by each filter stage.
    pub removed: Vec<StageRemoval>,
    /// Rows removed by deduplication.
    pub duplicates: Vec<DroppedRow>,
}

/// Runs detection, canonicalization, filtering and deduplication.
pub struct Sifter {
    config: PipelineConfig,
    parser: Parser,
    detector: SchemaDetector,
    today: NaiveDate,
}

impl Sifter {
    /// Create a sifter with the default preset.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a sifter with custom options.
    pub fn with_config(config: PipelineConfig) -> Self {
        let detector = SchemaDetector::with_config(config.detection.clone());
        Self {
            config,
            parser: Parser::new(),
            detector,
            today: Local::now().date_naive(),
        }
    }

    /// Evaluate the delivery-age filter against a fixed date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_parser(mut self, config: ParserConfig) -> Self {
        self.parser = Parser::with_config(config);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read and sift a delimited export.
    pub fn sift_file(&self, path: impl AsRef<Path>) -> Result<SiftResult> {
        let (table, source) = self.parser.parse_file(path)?;
        let mut result = self.sift_table(&table)?;
        result.report.source = Some(source);
        Ok(result)
    }

    /// Run schema detection only, after the same preprocessing a full run
    /// applies.
    pub fn detect_file(&self, path: impl AsRef<Path>) -> Result<Detection> {
        let (table, _) = self.parser.parse_file(path)?;
        self.detect_table(&table)
    }

    pub fn detect_table(&self, table: &RawTable) -> Result<Detection> {
        let (prepared, _) = self.prepare(table)?;
        self.detector.detect(&prepared)
    }

    pub fn sift_table(&self, table: &RawTable) -> Result<SiftResult> {
        let mut report = RunReport::new(table.row_count());

        // Explode VIN lists, then normalize cells
        let (prepared, explosion) = self.prepare(table)?;
        report.explosion = explosion;

        // Detect the schema
        let detection = self.detector.detect(&prepared)?;
        report.mapping = detection.mapping.report();
        report.warnings = detection.warnings.clone();

        // Build canonical records
        let canonical =
            Canonicalizer::new(self.detector.matcher()).build(&detection.table, &detection.mapping);

        // Filter
        let filtered = FilterPipeline::new(&self.config, self.today).run(&canonical);
        report.stages = filtered.stages;

        // Deduplicate and verify
        let (table, duplicates) = if self.config.delete_duplicates {
            let outcome = Deduplicator::new().run(&filtered.table);
            report.stages.push(StageReport {
                name: "dedup".to_string(),
                rows_before: filtered.table.len(),
                rows_after: outcome.table.len(),
                skipped: None,
            });
            report.dedup = Some(DedupCounts::from(&outcome));
            report.verification = Some(verify(&outcome));
            (outcome.table, outcome.dropped)
        } else {
            (filtered.table, Vec::new())
        };

        report.rows_out = table.len();
        log::info!(
            "sifted {} rows -> {} rows ({} removed)",
            report.rows_in,
            report.rows_out,
            report.rows_removed()
        );

        Ok(SiftResult {
            table,
            mapping: detection.mapping,
            report,
            removed: filtered.removed,
            duplicates,
        })
    }

    fn prepare(&self, table: &RawTable) -> Result<(RawTable, Option<ExplosionSummary>)> {
        if table.is_empty() {
            return Err(SiftError::EmptyInput("the table has no data rows".to_string()));
        }

        let exploded = if self.config.vin_explosion {
            explode_vins(table, self.detector.matcher())
        } else {
            None
        };
        let (source, summary) = match exploded {
            Some((exploded, summary)) => (exploded, Some(summary)),
            None => (table.clone(), None),
        };
        if source.is_empty() {
            return Err(SiftError::EmptyInput(
                "no rows left after VIN explosion".to_string(),
            ));
        }

        Ok((clean_cells(&source), summary))
    }
}

impl Default for Sifter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalField;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let table = RawTable::from_rows(&["VIN", "City"], &[]);
        let err = Sifter::new().sift_table(&table).unwrap_err();
        assert!(matches!(err, SiftError::EmptyInput(_)));
    }

    #[test]
    fn test_dedup_toggle() {
        let table = RawTable::from_rows(
            &["VIN", "Delivery Date", "Year"],
            &[
                &["1HGCM82633A004352", "2021-01-01", "2020"],
                &["1HGCM82633A004352", "2022-06-15", "2020"],
            ],
        );
        let sifter = Sifter::new().with_today(today());
        let result = sifter.sift_table(&table).unwrap();
        assert_eq!(result.table.len(), 1);
        assert_eq!(result.table.records[0].row_number, 2);
        assert!(result.report.verification.as_ref().is_some_and(|v| v.passed()));

        let mut config = PipelineConfig::default();
        config.delete_duplicates = false;
        let result = Sifter::with_config(config).with_today(today()).sift_table(&table).unwrap();
        assert_eq!(result.table.len(), 2);
        assert!(result.report.dedup.is_none());
    }

    #[test]
    fn test_report_carries_mapping_and_stages() {
        let table = RawTable::from_rows(
            &["VIN", "Delivery Date"],
            &[&["1HGCM82633A004352", "2021-01-01"]],
        );
        let result = Sifter::new().with_today(today()).sift_table(&table).unwrap();
        assert_eq!(result.report.mapping[0].field, CanonicalField::Vin);
        assert_eq!(result.report.mapping[0].column.as_deref(), Some("VIN"));
        assert_eq!(result.report.stages.last().map(|s| s.name.as_str()), Some("dedup"));
        assert_eq!(result.report.rows_out, 1);
    }
}
