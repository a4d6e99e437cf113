//! Error types for the dealsift library.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::schema::{CanonicalField, Candidate};

/// Main error type for dealsift operations.
///
/// Only schema detection can fail at runtime; filters and the deduplicator
/// are total. The remaining variants come from the file collaborators.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zero-row input, or no columns at all.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Two source columns remain tied for a field that must be unique.
    #[error(
        "Ambiguous mapping for {field}: '{first}' ({first_score:.1}) vs '{second}' ({second_score:.1})"
    )]
    Ambiguity {
        field: CanonicalField,
        first: String,
        first_score: f64,
        second: String,
        second_score: f64,
    },

    /// A chosen column failed its confidence gate.
    #[error(
        "Low confidence for {field} mapped to '{column}': {metric} = {value:.2} (threshold {threshold:.2}); alternatives: {}",
        AlternativeList(.alternatives)
    )]
    LowConfidence {
        field: CanonicalField,
        column: String,
        metric: &'static str,
        value: f64,
        threshold: f64,
        alternatives: Vec<Candidate>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SiftError {
    /// Whether this error came out of schema detection.
    pub fn is_detection_error(&self) -> bool {
        matches!(
            self,
            SiftError::Ambiguity { .. } | SiftError::LowConfidence { .. } | SiftError::EmptyInput(_)
        )
    }
}

/// Formats a candidate list as `'col' (score), ...`.
struct AlternativeList<'a>(&'a [Candidate]);

impl fmt::Display for AlternativeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }
        for (i, candidate) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}' ({:.1})", candidate.column, candidate.score)?;
        }
        Ok(())
    }
}

/// Serializable summary of an error, used by the run report.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    pub kind: &'static str,
    pub message: String,
}

impl From<&SiftError> for ErrorSummary {
    fn from(err: &SiftError) -> Self {
        let kind = match err {
            SiftError::Io { .. } => "io",
            SiftError::Csv(_) => "csv",
            SiftError::Json(_) => "json",
            SiftError::EmptyInput(_) => "empty_input",
            SiftError::Ambiguity { .. } => "ambiguity",
            SiftError::LowConfidence { .. } => "low_confidence",
            SiftError::Config(_) => "config",
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result type alias for dealsift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
