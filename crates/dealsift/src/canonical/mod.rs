//! Canonical records: typed rows assembled from a detected table.

pub mod address;
pub mod phone;
pub mod vin;

mod builder;
mod record;

pub use builder::{clean_cells, Canonicalizer};
pub use record::{CanonicalRecord, CanonicalTable};
pub use vin::{explode_vins, ExplosionSummary};
