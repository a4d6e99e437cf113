//! Dealsift: schema detection, filtering and deduplication for vehicle-sale
//! customer exports.
//!
//! Dealer management systems export customer lists with arbitrary column
//! names and orderings. Dealsift works out which column holds which
//! canonical field, builds typed records, applies a fixed chain of
//! exclusion filters and removes duplicate customers, producing a contact
//! list in a locked column order.
//!
//! # Pipeline
//!
//! raw table → VIN explosion → cell cleanup → schema detection →
//! canonical records → filters → two-pass deduplication → output
//!
//! # Example
//!
//! ```no_run
//! use dealsift::{Sifter, PipelineConfig};
//!
//! let sifter = Sifter::with_config(PipelineConfig::default());
//! let result = sifter.sift_file("export.csv").unwrap();
//!
//! println!("Rows kept: {}", result.table.len());
//! for entry in &result.report.mapping {
//!     println!("{} <- {:?}", entry.field, entry.column);
//! }
//! ```

pub mod canonical;
pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod lexicon;
pub mod pipeline;
pub mod schema;

mod sifter;

pub use crate::sifter::{SiftResult, Sifter};
pub use canonical::{CanonicalRecord, CanonicalTable};
pub use error::{ErrorSummary, Result, SiftError};
pub use inference::{Detection, DetectionConfig, SchemaDetector};
pub use input::{Parser, ParserConfig, RawTable, SourceMetadata};
pub use pipeline::{PipelineConfig, RunReport};
pub use schema::{CanonicalField, FieldMapping};
