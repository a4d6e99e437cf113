//! Run options for the filter pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::inference::DetectionConfig;

/// Model-year window options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelYearOptions {
    pub enabled: bool,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ModelYearOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            min_year: 2013,
            max_year: 2024,
        }
    }
}

/// Delivery-age options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryAgeOptions {
    pub enabled: bool,
    /// Minimum age of the effective date, in months.
    pub months: u32,
}

impl Default for DeliveryAgeOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            months: 18,
        }
    }
}

/// Customer-distance options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceOptions {
    pub enabled: bool,
    pub max_miles: f64,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_miles: 100.0,
        }
    }
}

/// Immutable configuration for one run.
///
/// Missing keys in a JSON file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub delete_duplicates: bool,
    pub vin_explosion: bool,
    pub address_present: bool,
    pub name_present: bool,
    pub delete_out_of_state: bool,
    /// Two-letter code kept by the out-of-state filter.
    pub home_state: String,
    pub model_year_filter: ModelYearOptions,
    pub delivery_age_filter: DeliveryAgeOptions,
    pub distance_filter: DistanceOptions,
    pub exclude_corporate: bool,
    /// Whether a PO-box Address2 satisfies the address-presence filter.
    pub po_box_counts_as_address: bool,
    /// Schema detection thresholds.
    pub detection: DetectionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delete_duplicates: true,
            vin_explosion: true,
            address_present: true,
            name_present: false,
            delete_out_of_state: false,
            home_state: "CA".to_string(),
            model_year_filter: ModelYearOptions::default(),
            delivery_age_filter: DeliveryAgeOptions::default(),
            distance_filter: DistanceOptions::default(),
            exclude_corporate: true,
            po_box_counts_as_address: true,
            detection: DetectionConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject option combinations no run can honor.
    pub fn validate(&self) -> Result<()> {
        if self.delete_out_of_state && self.home_state.trim().len() != 2 {
            return Err(SiftError::Config(format!(
                "home_state must be a two-letter code, got '{}'",
                self.home_state
            )));
        }
        let years = &self.model_year_filter;
        if years.enabled && years.min_year > years.max_year {
            return Err(SiftError::Config(format!(
                "model_year_filter.min_year {} is after max_year {}",
                years.min_year, years.max_year
            )));
        }
        let max_miles = self.distance_filter.max_miles;
        if self.distance_filter.enabled && (max_miles.is_nan() || max_miles < 0.0) {
            return Err(SiftError::Config(
                "distance_filter.max_miles must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_preset() {
        let config = PipelineConfig::default();
        assert!(config.delete_duplicates);
        assert!(config.vin_explosion);
        assert!(!config.name_present);
        assert_eq!(config.home_state, "CA");
        assert_eq!(config.model_year_filter.min_year, 2013);
        assert_eq!(config.delivery_age_filter.months, 18);
        assert_eq!(config.distance_filter.max_miles, 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"name_present": true, "model_year_filter": {"max_year": 2022}}"#,
        )
        .unwrap();
        assert!(config.name_present);
        assert_eq!(config.model_year_filter.max_year, 2022);
        assert_eq!(config.model_year_filter.min_year, 2013);
        assert!(config.exclude_corporate);
        assert_eq!(config.detection, DetectionConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.delete_out_of_state = true;
        config.home_state = "Texas".into();
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));

        let mut config = PipelineConfig::default();
        config.model_year_filter.min_year = 2030;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"home_state": "TX", "delete_out_of_state": true}"#).unwrap();
        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.home_state, "TX");
    }
}
