//! Schema detection: header scoring, value heuristics and column selection.

pub mod composite;
pub mod header;
pub mod heuristics;

mod detector;
mod gates;

pub use composite::{split_composites, CompositeSplit, CszParts, CSZ_CITY, CSZ_STATE, CSZ_ZIP};
pub use detector::{date_precedence, is_date_header, Detection, DetectionConfig, SchemaDetector};
pub use header::{normalize_label, HeaderMatcher};
