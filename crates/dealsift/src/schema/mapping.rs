//! Field mapping produced by schema detection.

use indexmap::IndexMap;
use serde::Serialize;

use super::field::CanonicalField;

/// A scored (column, field) pairing considered during detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Source column header.
    pub column: String,
    /// Column position in the detection table.
    pub index: usize,
    /// Combined header/value score.
    pub score: f64,
}

impl Candidate {
    pub fn new(column: impl Into<String>, index: usize, score: f64) -> Self {
        Self {
            column: column.into(),
            index,
            score,
        }
    }
}

/// The source column chosen for a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedColumn {
    /// Source column header.
    pub column: String,
    /// Column position in the detection table.
    pub index: usize,
    /// Winning score.
    pub score: f64,
    /// Whether the column was synthesized by the composite splitter.
    pub synthetic: bool,
}

impl From<&Candidate> for MappedColumn {
    fn from(candidate: &Candidate) -> Self {
        Self {
            column: candidate.column.clone(),
            index: candidate.index,
            score: candidate.score,
            synthetic: false,
        }
    }
}

/// Canonical field to source column assignments.
///
/// A field is either mapped to exactly one column or absent. Rejected
/// candidates are kept per field for diagnostics only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldMapping {
    columns: IndexMap<CanonicalField, MappedColumn>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    alternatives: IndexMap<CanonicalField, Vec<Candidate>>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a column to a field, replacing any earlier choice.
    pub fn insert(&mut self, field: CanonicalField, column: MappedColumn) {
        self.columns.insert(field, column);
    }

    /// Remove a field's assignment.
    pub fn remove(&mut self, field: CanonicalField) -> Option<MappedColumn> {
        self.columns.shift_remove(&field)
    }

    /// Record the ranked candidates for a field.
    pub fn set_alternatives(&mut self, field: CanonicalField, candidates: Vec<Candidate>) {
        self.alternatives.insert(field, candidates);
    }

    pub fn get(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.columns.get(&field)
    }

    /// Column index mapped to a field, if any.
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    /// Column header mapped to a field, if any.
    pub fn column_name(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(|c| c.column.as_str())
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Ranked candidates recorded for a field.
    pub fn alternatives(&self, field: CanonicalField) -> &[Candidate] {
        self.alternatives
            .get(&field)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Mapped fields in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &MappedColumn)> {
        self.columns.iter().map(|(f, c)| (*f, c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Mapping for the reported subset, in report order.
    pub fn report(&self) -> Vec<MappingReportEntry> {
        CanonicalField::REPORTED
            .iter()
            .map(|&field| MappingReportEntry {
                field,
                column: self.column_name(field).map(str::to_string),
            })
            .collect()
    }
}

/// One row of the mapping report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingReportEntry {
    pub field: CanonicalField,
    pub column: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(name: &str, index: usize) -> MappedColumn {
        MappedColumn {
            column: name.to_string(),
            index,
            score: 100.0,
            synthetic: false,
        }
    }

    #[test]
    fn test_insert_replaces_previous_choice() {
        let mut mapping = FieldMapping::new();
        mapping.insert(CanonicalField::City, mapped("City/State/Zip", 3));
        mapping.insert(CanonicalField::City, mapped("__CSZ_City", 7));

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.column_name(CanonicalField::City), Some("__CSZ_City"));
        assert_eq!(mapping.index_of(CanonicalField::City), Some(7));
    }

    #[test]
    fn test_report_lists_reported_fields_in_order() {
        let mut mapping = FieldMapping::new();
        mapping.insert(CanonicalField::Zip, mapped("Zip Code", 5));
        mapping.insert(CanonicalField::Vin, mapped("VIN", 0));

        let report = mapping.report();
        let fields: Vec<_> = report.iter().map(|e| e.field).collect();
        assert_eq!(fields, CanonicalField::REPORTED.to_vec());
        assert_eq!(report[0].column.as_deref(), Some("VIN"));
        assert_eq!(report[1].column, None);
        assert_eq!(report[5].column.as_deref(), Some("Zip Code"));
    }

    #[test]
    fn test_alternatives_default_empty() {
        let mapping = FieldMapping::new();
        assert!(mapping.alternatives(CanonicalField::State).is_empty());
    }
}
