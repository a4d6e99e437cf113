//! Filter pipeline, deduplication and verification.

pub mod corporate;
pub mod dedup;
pub mod filters;
pub mod verify;

mod config;
mod report;

use chrono::NaiveDate;

use crate::canonical::{CanonicalRecord, CanonicalTable};

pub use config::{DeliveryAgeOptions, DistanceOptions, ModelYearOptions, PipelineConfig};
pub use dedup::{DedupOutcome, Deduplicator, DropReason, DroppedRow};
pub use filters::{enabled_filters, Filter, FilterOutcome};
pub use report::{DedupCounts, RunReport, StageReport};
pub use verify::{verify, Verification, Violation};

/// Rows removed by one stage.
#[derive(Debug, Clone)]
pub struct StageRemoval {
    pub stage: &'static str,
    pub rows: Vec<CanonicalRecord>,
}

/// Output of the filter stages.
#[derive(Debug, Clone)]
pub struct FilterRun {
    pub table: CanonicalTable,
    pub stages: Vec<StageReport>,
    pub removed: Vec<StageRemoval>,
}

/// Runs the enabled filters in their fixed order.
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Build the pipeline for a configuration, evaluating date filters
    /// against `today`.
    pub fn new(config: &PipelineConfig, today: NaiveDate) -> Self {
        Self {
            filters: enabled_filters(config, today),
        }
    }

    /// Build a pipeline from explicit stages.
    pub fn with_filters(filters: Vec<Box<dyn Filter>>) -> Self {
        Self { filters }
    }

    /// Names of the stages that will run.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn run(&self, table: &CanonicalTable) -> FilterRun {
        let mut current = table.clone();
        let mut stages = Vec::with_capacity(self.filters.len());
        let mut removed = Vec::new();

        for filter in &self.filters {
            let before = current.len();
            let outcome = filter.apply(&current);
            match &outcome.skipped {
                Some(reason) => log::info!("{}: skipped ({})", filter.name(), reason),
                None => log::info!(
                    "{}: {} -> {} rows",
                    filter.name(),
                    before,
                    outcome.table.len()
                ),
            }
            stages.push(StageReport {
                name: filter.name().to_string(),
                rows_before: before,
                rows_after: outcome.table.len(),
                skipped: outcome.skipped,
            });
            if !outcome.removed.is_empty() {
                removed.push(StageRemoval {
                    stage: filter.name(),
                    rows: outcome.removed,
                });
            }
            current = outcome.table;
        }

        FilterRun {
            table: current,
            stages,
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalField;

    fn row(n: usize, name: &str, year: &str) -> CanonicalRecord {
        let mut r = CanonicalRecord::new(n);
        r.full_name = Some(name.to_string());
        r.year = Some(year.to_string());
        r
    }

    #[test]
    fn test_stages_run_in_order_with_counts() {
        let table = CanonicalTable {
            fields: vec![CanonicalField::FullName, CanonicalField::Year],
            records: vec![
                row(1, "ABC Motors LLC", "2020"),
                row(2, "Jane Doe", "2012"),
                row(3, "Bob Lee", "2018"),
            ],
            ..Default::default()
        };
        let config = PipelineConfig::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let pipeline = FilterPipeline::new(&config, today);
        assert_eq!(
            pipeline.stage_names(),
            vec!["corporate", "address_present", "model_year", "delivery_age", "distance"]
        );

        let run = pipeline.run(&table);
        let kept: Vec<usize> = run.table.records.iter().map(|r| r.row_number).collect();
        assert_eq!(kept, vec![3]);
        assert_eq!(run.stages[0].removed(), 1);
        assert!(run.stages[1].skipped.is_some());
        assert_eq!(run.stages[2].removed(), 1);
        let stages: Vec<&str> = run.removed.iter().map(|r| r.stage).collect();
        assert_eq!(stages, vec!["corporate", "model_year"]);
    }
}
