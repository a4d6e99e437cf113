//! Canonical fields, their matching rules, and detected mappings.

pub mod catalog;
mod field;
mod mapping;

pub use catalog::{FieldRule, ValueCheck, FIELD_RULES};
pub use field::CanonicalField;
pub use mapping::{Candidate, FieldMapping, MappedColumn, MappingReportEntry};
