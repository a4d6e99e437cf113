//! Input parsing and the raw table model.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{RawTable, SourceMetadata};
