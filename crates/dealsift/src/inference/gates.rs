//! Post-selection remapping and confidence gates.

use super::composite::{self, CSZ_CITY, CSZ_STATE, CSZ_ZIP};
use super::detector::{cooccurrence, ColumnProfile, DetectionConfig};
use super::header::contains_keyword;
use super::heuristics::{self, rate};
use crate::error::{Result, SiftError};
use crate::input::RawTable;
use crate::lexicon::{MODEL_HEADER_TOKENS, NAME_HEADER_TOKENS};
use crate::schema::{CanonicalField, Candidate, FieldMapping, MappedColumn};

/// Number of alternatives listed in a gate failure.
const MAX_ALTERNATIVES: usize = 3;

pub(crate) struct Gates<'a> {
    pub table: &'a RawTable,
    pub profiles: &'a [ColumnProfile<'a>],
    pub config: &'a DetectionConfig,
}

impl Gates<'_> {
    /// Replace City/State/Zip choices with the split columns where the chosen
    /// column is itself composite or clearly weaker on content.
    pub fn prefer_split_columns(&self, mapping: &mut FieldMapping, warnings: &mut Vec<String>) {
        let pairs = [
            (CanonicalField::City, CSZ_CITY),
            (CanonicalField::State, CSZ_STATE),
            (CanonicalField::Zip, CSZ_ZIP),
        ];
        for (field, synthetic_name) in pairs {
            let Some(synthetic) = self.table.column_index(synthetic_name) else {
                continue;
            };
            let Some(chosen) = mapping.get(field) else {
                continue;
            };
            if chosen.synthetic {
                continue;
            }

            let chosen_profile = &self.profiles[chosen.index];
            let threshold = self.config.composite_override_rate;
            let composite_header = composite::is_composite_header(&chosen_profile.normalized);
            let weaker = chosen_profile.likeness(field) < threshold
                && self.profiles[synthetic].likeness(field) >= threshold;
            if !composite_header && !weaker {
                continue;
            }

            let warning = format!(
                "{}: remapped '{}' to split column '{}'",
                field, chosen.column, synthetic_name
            );
            self.remap(mapping, field, synthetic);
            warnings.push(warning);
        }
    }

    /// Apply the per-field confidence gates in order.
    pub fn enforce(&self, mapping: &mut FieldMapping, warnings: &mut Vec<String>) -> Result<()> {
        let cfg = self.config;

        if let Some(profile) = self.profile_of(mapping, CanonicalField::Address1, warnings) {
            let threshold = if profile.po_box_rate > 0.5 {
                cfg.min_street_rate_po_box
            } else {
                cfg.min_street_rate
            };
            self.check(
                mapping,
                CanonicalField::Address1,
                "street_rate",
                profile.street_rate,
                threshold,
            )?;
        }

        self.guard_city(mapping, warnings)?;

        if let Some(profile) = self.profile_of(mapping, CanonicalField::City, warnings) {
            let city_rate = profile.city_rate;
            self.check(mapping, CanonicalField::City, "city_rate", city_rate, cfg.min_city_rate)?;
            let state = mapping.index_of(CanonicalField::State);
            let zip = mapping.index_of(CanonicalField::Zip);
            if state.is_some() && zip.is_some() {
                let co = cooccurrence(self.table, profile.index, state, zip);
                self.check(
                    mapping,
                    CanonicalField::City,
                    "state_zip_cooccurrence",
                    co,
                    cfg.min_city_cooccurrence,
                )?;
            }
        }

        if let Some(profile) = self.profile_of(mapping, CanonicalField::State, warnings) {
            let rate = profile.state_rate;
            self.check(mapping, CanonicalField::State, "state_rate", rate, cfg.min_state_rate)?;
        }
        if let Some(profile) = self.profile_of(mapping, CanonicalField::Zip, warnings) {
            let rate = profile.zip_rate;
            self.check(mapping, CanonicalField::Zip, "zip_rate", rate, cfg.min_zip_rate)?;
        }
        if let Some(profile) = self.profile_of(mapping, CanonicalField::Vin, warnings) {
            let vin_rate = rate(&profile.sample, heuristics::is_valid_vin);
            self.check(mapping, CanonicalField::Vin, "vin_rate", vin_rate, cfg.min_vin_rate)?;
        }
        if let Some(profile) = self.profile_of(mapping, CanonicalField::DeliveryDate, warnings) {
            let date_rate = rate(&profile.sample, |v| heuristics::parse_date(v).is_some());
            let field = CanonicalField::DeliveryDate;
            self.check(mapping, field, "date_rate", date_rate, cfg.min_date_rate)?;
        }

        Ok(())
    }

    /// Reject City columns that hold names, models or manufacturers.
    fn guard_city(&self, mapping: &mut FieldMapping, warnings: &mut Vec<String>) -> Result<()> {
        let field = CanonicalField::City;
        let Some(chosen) = mapping.get(field) else {
            return Ok(());
        };
        if chosen.synthetic {
            return Ok(());
        }
        let profile = &self.profiles[chosen.index];
        let cfg = self.config;

        let header_hit = NAME_HEADER_TOKENS
            .iter()
            .chain(MODEL_HEADER_TOKENS)
            .any(|t| contains_keyword(&profile.normalized, t));
        let overlap = mapping
            .index_of(CanonicalField::LastName)
            .map(|last| self.last_name_overlap(profile.index, last))
            .unwrap_or(0.0);

        let failure = if header_hit {
            Some(("name_or_model_header", 1.0, 0.0))
        } else if profile.oem_rate >= cfg.max_city_oem_rate {
            Some(("oem_rate", profile.oem_rate, cfg.max_city_oem_rate))
        } else if overlap >= cfg.max_city_last_name_overlap {
            Some(("last_name_overlap", overlap, cfg.max_city_last_name_overlap))
        } else {
            None
        };
        let Some((metric, value, threshold)) = failure else {
            return Ok(());
        };

        if let Some(synthetic) = self.table.column_index(CSZ_CITY) {
            warnings.push(format!(
                "{}: '{}' looks like a non-city column ({} = {:.2}), remapped to '{}'",
                field, chosen.column, metric, value, CSZ_CITY
            ));
            self.remap(mapping, field, synthetic);
            return Ok(());
        }

        Err(self.low_confidence(mapping, field, metric, value, threshold))
    }

    /// Share of rows where the City and Last_Name cells are equal.
    fn last_name_overlap(&self, city: usize, last: usize) -> f64 {
        if self.table.is_empty() {
            return 0.0;
        }
        let same = self
            .table
            .rows
            .iter()
            .filter(|row| {
                let c = row[city].trim();
                !c.is_empty() && c.eq_ignore_ascii_case(row[last].trim())
            })
            .count();
        same as f64 / self.table.row_count() as f64
    }

    /// Profile of the column mapped to a field, or `None` when unmapped or
    /// when the column has no values to judge.
    fn profile_of(
        &self,
        mapping: &FieldMapping,
        field: CanonicalField,
        warnings: &mut Vec<String>,
    ) -> Option<&ColumnProfile<'_>> {
        let chosen = mapping.get(field)?;
        let profile = &self.profiles[chosen.index];
        if profile.sample.is_empty() {
            warnings.push(format!(
                "{}: column '{}' has no values, confidence gate skipped",
                field, chosen.column
            ));
            return None;
        }
        Some(profile)
    }

    fn check(
        &self,
        mapping: &FieldMapping,
        field: CanonicalField,
        metric: &'static str,
        value: f64,
        threshold: f64,
    ) -> Result<()> {
        if value >= threshold {
            return Ok(());
        }
        Err(self.low_confidence(mapping, field, metric, value, threshold))
    }

    fn low_confidence(
        &self,
        mapping: &FieldMapping,
        field: CanonicalField,
        metric: &'static str,
        value: f64,
        threshold: f64,
    ) -> SiftError {
        let chosen = mapping.get(field);
        let column = chosen.map(|c| c.column.clone()).unwrap_or_default();
        let chosen_index = chosen.map(|c| c.index);
        let alternatives: Vec<Candidate> = mapping
            .alternatives(field)
            .iter()
            .filter(|c| Some(c.index) != chosen_index)
            .take(MAX_ALTERNATIVES)
            .cloned()
            .collect();
        SiftError::LowConfidence {
            field,
            column,
            metric,
            value,
            threshold,
            alternatives,
        }
    }

    fn remap(&self, mapping: &mut FieldMapping, field: CanonicalField, index: usize) {
        let score = mapping
            .alternatives(field)
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.score)
            .or_else(|| mapping.get(field).map(|c| c.score))
            .unwrap_or_default();
        mapping.insert(
            field,
            MappedColumn {
                column: self.table.headers[index].clone(),
                index,
                score,
                synthetic: true,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::SchemaDetector;

    #[test]
    fn test_address_gate_accepts_po_boxes() {
        let table = RawTable::from_rows(
            &["Address"],
            &[
                &["PO Box 12"],
                &["P.O. Box 7"],
                &["PO Box 19"],
                &["Rural Route"],
            ],
        );
        let detection = SchemaDetector::new().detect(&table).unwrap();
        assert_eq!(detection.mapping.column_name(CanonicalField::Address1), Some("Address"));
    }

    #[test]
    fn test_city_guard_remaps_to_split_city() {
        // "Town" holds surnames, the composite column holds the real cities
        let table = RawTable::from_rows(
            &["Last Name", "Town", "CSZ"],
            &[
                &["Smith", "Smith", "Austin, TX 73301"],
                &["Doe", "Doe", "Dallas, TX 75201"],
                &["Lee", "Lee", "Reno, NV 89501"],
                &["Kim", "Kim", ""],
            ],
        );
        let detection = SchemaDetector::new().detect(&table).unwrap();
        assert_eq!(detection.mapping.column_name(CanonicalField::City), Some(CSZ_CITY));
        assert!(!detection.warnings.is_empty());
    }

    #[test]
    fn test_city_guard_fails_without_split_city() {
        let table = RawTable::from_rows(
            &["Last Name", "City"],
            &[&["Smith", "Smith"], &["Doe", "Doe"], &["Lee", "Austin"]],
        );
        match SchemaDetector::new().detect(&table).unwrap_err() {
            SiftError::LowConfidence { field, metric, .. } => {
                assert_eq!(field, CanonicalField::City);
                assert_eq!(metric, "last_name_overlap");
            }
            other => panic!("expected low confidence, got {other}"),
        }
    }

    #[test]
    fn test_city_gate_requires_state_zip_cooccurrence() {
        // Cities and state/zip pairs never share a row
        let cities = ["Austin", "Dallas", "Houston", "Waco", "Tyler", "Plano"];
        let mut rows: Vec<Vec<String>> = cities
            .iter()
            .map(|c| vec![c.to_string(), String::new(), String::new()])
            .collect();
        for i in 0..24 {
            rows.push(vec![String::new(), "TX".to_string(), format!("7330{}", i % 10)]);
        }
        let table = RawTable::new(vec!["City".into(), "State".into(), "Zip".into()], rows);

        match SchemaDetector::new().detect(&table).unwrap_err() {
            SiftError::LowConfidence { field, column, metric, value, threshold, .. } => {
                assert_eq!(field, CanonicalField::City);
                assert_eq!(column, "City");
                assert_eq!(metric, "state_zip_cooccurrence");
                assert_eq!(value, 0.0);
                assert_eq!(threshold, 0.3);
            }
            other => panic!("expected low confidence, got {other}"),
        }
    }

    #[test]
    fn test_date_gate_lists_alternatives() {
        let table = RawTable::from_rows(
            &["Sold Date", "Delivery"],
            &[&["??", "??"], &["--", ""]],
        );
        match SchemaDetector::new().detect(&table).unwrap_err() {
            SiftError::LowConfidence { field, metric, alternatives, column, .. } => {
                assert_eq!(field, CanonicalField::DeliveryDate);
                assert_eq!(metric, "date_rate");
                assert!(alternatives.iter().all(|c| c.column != column));
                assert!(alternatives.len() <= MAX_ALTERNATIVES);
            }
            other => panic!("expected low confidence, got {other}"),
        }
    }

    #[test]
    fn test_empty_mapped_column_skips_gate() {
        let table = RawTable::from_rows(&["VIN", "Name"], &[&["", "A"], &["", "B"]]);
        let detection = SchemaDetector::new().detect(&table).unwrap();
        assert!(detection.warnings.iter().any(|w| w.contains("no values")));
    }
}
