//! Run report: what was detected, what each stage removed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dedup::{DedupOutcome, DropReason};
use super::verify::Verification;
use crate::canonical::ExplosionSummary;
use crate::error::ErrorSummary;
use crate::input::SourceMetadata;
use crate::schema::MappingReportEntry;

/// Row counts around one pipeline stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub name: String,
    pub rows_before: usize,
    pub rows_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl StageReport {
    pub fn removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Deduplicator counts by drop reason.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupCounts {
    pub by_vin: usize,
    pub by_address: usize,
    pub cross_pass: usize,
}

impl From<&DedupOutcome> for DedupCounts {
    fn from(outcome: &DedupOutcome) -> Self {
        Self {
            by_vin: outcome.count(DropReason::Vin),
            by_address: outcome.count(DropReason::Address),
            cross_pass: outcome.count(DropReason::CrossPass),
        }
    }
}

/// Everything a caller needs to explain one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub mapping: Vec<MappingReportEntry>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explosion: Option<ExplosionSummary>,
    pub stages: Vec<StageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup: Option<DedupCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(rows_in: usize) -> Self {
        Self {
            source: None,
            rows_in,
            rows_out: 0,
            mapping: Vec::new(),
            warnings: Vec::new(),
            explosion: None,
            stages: Vec::new(),
            dedup: None,
            verification: None,
            error: None,
            generated_at: Utc::now(),
        }
    }

    /// Total rows removed by filters and deduplication.
    pub fn rows_removed(&self) -> usize {
        self.stages.iter().map(StageReport::removed).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_removed_sums_stages() {
        let mut report = RunReport::new(10);
        report.stages.push(StageReport {
            name: "corporate".into(),
            rows_before: 10,
            rows_after: 8,
            skipped: None,
        });
        report.stages.push(StageReport {
            name: "distance".into(),
            rows_before: 8,
            rows_after: 8,
            skipped: Some("distance coverage 0.0% below 5%".into()),
        });
        assert_eq!(report.rows_removed(), 2);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"rows_in\": 10"));
        assert!(json.contains("coverage"));
        assert!(!json.contains("\"error\""));
    }
}
