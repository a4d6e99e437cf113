//! Schema detection: combining header and value signals into a mapping.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::composite;
use super::gates;
use super::header::{contains_keyword, normalize_label, HeaderMatcher};
use super::heuristics::{self, rate};
use crate::error::{Result, SiftError};
use crate::input::RawTable;
use crate::lexicon::DATE_PRECEDENCE;
use crate::schema::catalog::FUZZY_CANDIDATE;
use crate::schema::{CanonicalField, Candidate, FieldMapping, MappedColumn, ValueCheck};

/// Thresholds used by schema detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Non-missing values sampled per column.
    pub sample_size: usize,
    /// Minimum header (or value-driven) score for a candidate.
    pub candidate_threshold: f64,
    /// Score gap at or below which two candidates are ambiguous.
    pub ambiguity_epsilon: f64,
    /// Columns more numeric than this skip value-driven street and city
    /// candidates. State and Zip are always evaluated.
    pub numeric_skip_rate: f64,
    /// Street-likeness needed for a value-driven Address1/Address2 candidate.
    pub street_candidate_rate: f64,
    /// City-likeness needed for a value-driven City candidate.
    pub city_candidate_rate: f64,
    /// State/zip-likeness needed for value-driven State/Zip candidates.
    pub state_zip_candidate_rate: f64,
    /// Bonus when a value-driven candidate's header also matches the field.
    pub agreement_bonus: f64,
    /// Value-likeness below which a split column replaces the chosen one.
    pub composite_override_rate: f64,
    pub min_street_rate: f64,
    /// Street-likeness accepted when most values are PO boxes.
    pub min_street_rate_po_box: f64,
    pub min_city_rate: f64,
    pub min_city_cooccurrence: f64,
    pub max_city_oem_rate: f64,
    pub max_city_last_name_overlap: f64,
    pub min_state_rate: f64,
    pub min_zip_rate: f64,
    pub min_vin_rate: f64,
    pub min_date_rate: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: 500,
            candidate_threshold: FUZZY_CANDIDATE,
            ambiguity_epsilon: 2.0,
            numeric_skip_rate: 0.8,
            street_candidate_rate: 0.2,
            city_candidate_rate: 0.3,
            state_zip_candidate_rate: 0.3,
            agreement_bonus: 10.0,
            composite_override_rate: 0.5,
            min_street_rate: 0.5,
            min_street_rate_po_box: 0.25,
            min_city_rate: 0.5,
            min_city_cooccurrence: 0.3,
            max_city_oem_rate: 0.2,
            max_city_last_name_overlap: 0.3,
            min_state_rate: 0.6,
            min_zip_rate: 0.6,
            min_vin_rate: 0.5,
            min_date_rate: 0.5,
        }
    }
}

/// Sampled value statistics for one column.
#[derive(Debug, Clone)]
pub struct ColumnProfile<'a> {
    pub index: usize,
    pub header: &'a str,
    pub normalized: String,
    pub sample: Vec<&'a str>,
    /// Non-missing cells in the whole column.
    pub non_null: usize,
    /// Distinct non-missing cells in the whole column.
    pub distinct: usize,
    pub numeric_rate: f64,
    pub street_rate: f64,
    pub city_rate: f64,
    pub state_rate: f64,
    pub zip_rate: f64,
    pub oem_rate: f64,
    pub po_box_rate: f64,
}

impl<'a> ColumnProfile<'a> {
    pub fn build(table: &'a RawTable, index: usize, sample_size: usize) -> Self {
        let sample = heuristics::sample_column(table, index, sample_size);
        let mut seen = HashSet::new();
        let mut non_null = 0;
        for value in table.column_values(index) {
            let value = value.trim();
            if !RawTable::is_missing(value) {
                non_null += 1;
                seen.insert(value);
            }
        }

        Self {
            index,
            header: &table.headers[index],
            normalized: normalize_label(&table.headers[index]),
            non_null,
            distinct: seen.len(),
            numeric_rate: rate(&sample, heuristics::is_numeric),
            street_rate: rate(&sample, heuristics::is_street),
            city_rate: rate(&sample, heuristics::is_city),
            state_rate: rate(&sample, heuristics::is_state),
            zip_rate: rate(&sample, heuristics::is_zip),
            oem_rate: rate(&sample, heuristics::is_oem),
            po_box_rate: rate(&sample, heuristics::is_po_box),
            sample,
        }
    }

    /// Value-likeness of this column for an address field.
    pub fn likeness(&self, field: CanonicalField) -> f64 {
        match field {
            CanonicalField::Address1 => self.street_rate,
            CanonicalField::City => self.city_rate,
            CanonicalField::State => self.state_rate,
            CanonicalField::Zip => self.zip_rate,
            _ => 0.0,
        }
    }

    /// Near-constant columns that should not pass for a City column.
    fn is_low_cardinality(&self) -> bool {
        if self.non_null == 0 {
            return false;
        }
        let ratio = self.distinct as f64 / self.non_null as f64;
        ratio < 0.001 || (self.non_null >= 20 && self.distinct <= 2)
    }
}

/// Outcome of schema detection.
#[derive(Debug, Clone)]
pub struct Detection {
    /// The detected table: the input plus any synthetic split columns.
    /// Mapping indices point into this table.
    pub table: RawTable,
    pub mapping: FieldMapping,
    pub warnings: Vec<String>,
    /// Columns recognized as combined City/State/Zip.
    pub composite_sources: Vec<usize>,
}

/// Maps arbitrary export columns onto canonical fields.
pub struct SchemaDetector {
    matcher: HeaderMatcher,
    config: DetectionConfig,
}

impl SchemaDetector {
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            matcher: HeaderMatcher::new(),
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn matcher(&self) -> &HeaderMatcher {
        &self.matcher
    }

    /// Detect the mapping for a table.
    pub fn detect(&self, table: &RawTable) -> Result<Detection> {
        if table.column_count() == 0 {
            return Err(SiftError::EmptyInput("table has no columns".to_string()));
        }
        if table.is_empty() {
            return Err(SiftError::EmptyInput("table has no data rows".to_string()));
        }

        let split = composite::split_composites(table);
        let (mapping, warnings) = self.detect_columns(&split.table)?;

        for (field, column) in mapping.iter() {
            log::debug!("mapped {} <- '{}' ({:.1})", field, column.column, column.score);
        }
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        Ok(Detection {
            table: split.table,
            mapping,
            warnings,
            composite_sources: split.sources,
        })
    }

    fn detect_columns(&self, table: &RawTable) -> Result<(FieldMapping, Vec<String>)> {
        let profiles: Vec<ColumnProfile> = (0..table.column_count())
            .map(|i| ColumnProfile::build(table, i, self.config.sample_size))
            .collect();

        let mut candidates: IndexMap<CanonicalField, Vec<Candidate>> = IndexMap::new();
        self.header_candidates(&profiles, &mut candidates);
        self.value_candidates(table, &profiles, &mut candidates);
        self.date_candidates(&profiles, &mut candidates);

        let mut mapping = FieldMapping::new();
        for field in CanonicalField::all() {
            let Some(ranked) = candidates.get_mut(&field) else {
                continue;
            };
            ranked.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| {
                        profiles[a.index]
                            .normalized
                            .len()
                            .cmp(&profiles[b.index].normalized.len())
                    })
                    .then_with(|| a.index.cmp(&b.index))
            });
            if let Some(chosen) = self.select(field, ranked, &profiles)? {
                mapping.insert(field, chosen);
            }
            mapping.set_alternatives(field, ranked.clone());
        }

        let mut warnings = Vec::new();
        let gate = gates::Gates {
            table,
            profiles: &profiles,
            config: &self.config,
        };
        gate.prefer_split_columns(&mut mapping, &mut warnings);
        gate.enforce(&mut mapping, &mut warnings)?;

        Ok((mapping, warnings))
    }

    /// Header-driven candidates for every field.
    fn header_candidates(
        &self,
        profiles: &[ColumnProfile],
        candidates: &mut IndexMap<CanonicalField, Vec<Candidate>>,
    ) {
        let threshold = self.config.candidate_threshold;
        for field in CanonicalField::all() {
            let check = self.matcher.value_check(field);
            for profile in profiles {
                let header_score = self.matcher.header_score(field, &profile.normalized);
                if header_score < threshold {
                    continue;
                }
                let value_score = heuristics::value_score(check, &profile.sample);
                log::debug!(
                    "{} candidate '{}': header {:.1} + value {:.1}",
                    field,
                    profile.header,
                    header_score,
                    value_score
                );
                offer(candidates, field, profile, header_score.max(threshold) + value_score);
            }
        }
    }

    /// Candidates driven by cell contents, independent of header text.
    fn value_candidates(
        &self,
        table: &RawTable,
        profiles: &[ColumnProfile],
        candidates: &mut IndexMap<CanonicalField, Vec<Candidate>>,
    ) {
        let cfg = &self.config;
        let state_col = most_like(profiles, |p| p.state_rate, cfg.state_zip_candidate_rate);
        let zip_col = most_like(profiles, |p| p.zip_rate, cfg.state_zip_candidate_rate);

        for profile in profiles {
            let mut scored: Vec<(CanonicalField, f64)> = Vec::new();
            if profile.numeric_rate <= cfg.numeric_skip_rate {
                let r = profile.street_rate;
                if r >= cfg.street_candidate_rate {
                    scored.push((CanonicalField::Address1, 80.0 + 20.0 * r));
                    scored.push((CanonicalField::Address2, 70.0 + 15.0 * r));
                }
                let r = profile.city_rate;
                if r >= cfg.city_candidate_rate {
                    let co = cooccurrence(table, profile.index, state_col, zip_col);
                    let mut score = 80.0 + 20.0 * r + 20.0 * co - 60.0 * profile.oem_rate;
                    if profile.is_low_cardinality() {
                        score -= 20.0;
                    }
                    scored.push((CanonicalField::City, score));
                }
            }
            if profile.state_rate >= cfg.state_zip_candidate_rate {
                scored.push((CanonicalField::State, 85.0 + 15.0 * profile.state_rate));
            }
            if profile.zip_rate >= cfg.state_zip_candidate_rate {
                scored.push((CanonicalField::Zip, 85.0 + 15.0 * profile.zip_rate));
            }

            for (field, base) in scored {
                let header = &profile.normalized;
                let mut score = base - self.matcher.negative_penalty(field, header);
                if self.matcher.header_score(field, header) >= cfg.candidate_threshold {
                    score += cfg.agreement_bonus;
                }
                let score = score.max(0.0);
                if score < cfg.candidate_threshold {
                    continue;
                }
                log::debug!("{} value candidate '{}': {:.1}", field, profile.header, score);
                offer(candidates, field, profile, score);
            }
        }
    }

    /// DeliveryDate candidates from date-precedence header tokens.
    fn date_candidates(
        &self,
        profiles: &[ColumnProfile],
        candidates: &mut IndexMap<CanonicalField, Vec<Candidate>>,
    ) {
        let field = CanonicalField::DeliveryDate;
        for profile in profiles {
            if !is_date_header(&self.matcher, &profile.normalized) {
                continue;
            }
            let score = self.config.candidate_threshold
                + heuristics::value_score(ValueCheck::Date, &profile.sample);
            offer(candidates, field, profile, score);
        }
    }

    /// Pick the winner among ranked candidates, breaking near-ties.
    fn select(
        &self,
        field: CanonicalField,
        ranked: &[Candidate],
        profiles: &[ColumnProfile],
    ) -> Result<Option<MappedColumn>> {
        let Some(best) = ranked.first() else {
            return Ok(None);
        };
        if field.may_coexist() {
            return Ok(Some(mapped(best)));
        }

        let best_header = &profiles[best.index].normalized;
        let Some(second) = ranked
            .iter()
            .skip(1)
            .find(|c| &profiles[c.index].normalized != best_header)
        else {
            return Ok(Some(mapped(best)));
        };
        if best.score - second.score > self.config.ambiguity_epsilon {
            return Ok(Some(mapped(best)));
        }

        let (a, b) = (&profiles[best.index], &profiles[second.index]);
        let winner = if a.non_null != b.non_null {
            if a.non_null > b.non_null { best } else { second }
        } else if a.distinct != b.distinct {
            if a.distinct > b.distinct { best } else { second }
        } else {
            return Err(SiftError::Ambiguity {
                field,
                first: best.column.clone(),
                first_score: best.score,
                second: second.column.clone(),
                second_score: second.score,
            });
        };

        log::debug!(
            "{}: '{}' ({:.1}) and '{}' ({:.1}) are close, kept '{}'",
            field,
            best.column,
            best.score,
            second.column,
            second.score,
            winner.column
        );
        Ok(Some(mapped(winner)))
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a normalized header marks a delivery/sale date column.
///
/// Headers carrying a DeliveryDate negative keyword (birth date, payment due
/// date) are not date sources.
pub fn is_date_header(matcher: &HeaderMatcher, normalized: &str) -> bool {
    date_precedence(normalized).is_some()
        && !matcher.has_negative(CanonicalField::DeliveryDate, normalized)
}

/// Rank of the first date-precedence token a header contains.
pub fn date_precedence(normalized: &str) -> Option<usize> {
    DATE_PRECEDENCE
        .iter()
        .position(|token| contains_keyword(normalized, token))
}

fn mapped(candidate: &Candidate) -> MappedColumn {
    MappedColumn {
        synthetic: composite::is_synthetic(&candidate.column),
        ..MappedColumn::from(candidate)
    }
}

/// Record a candidate, keeping the best score per (field, column).
fn offer(
    candidates: &mut IndexMap<CanonicalField, Vec<Candidate>>,
    field: CanonicalField,
    profile: &ColumnProfile,
    score: f64,
) {
    let list = candidates.entry(field).or_default();
    match list.iter_mut().find(|c| c.index == profile.index) {
        Some(existing) => existing.score = existing.score.max(score),
        None => list.push(Candidate::new(profile.header, profile.index, score)),
    }
}

/// The column scoring highest on `likeness`, if it reaches `min`.
pub(crate) fn most_like(
    profiles: &[ColumnProfile],
    likeness: impl Fn(&ColumnProfile) -> f64,
    min: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for profile in profiles {
        let value = likeness(profile);
        if value > best.map_or(0.0, |(_, v)| v) {
            best = Some((profile.index, value));
        }
    }
    best.filter(|(_, v)| *v >= min).map(|(i, _)| i)
}

/// Fraction of rows where `city` is filled and the state and zip columns
/// hold valid values.
pub(crate) fn cooccurrence(
    table: &RawTable,
    city: usize,
    state: Option<usize>,
    zip: Option<usize>,
) -> f64 {
    let (Some(state), Some(zip)) = (state, zip) else {
        return 0.0;
    };
    if table.is_empty() {
        return 0.0;
    }
    let hits = table
        .rows
        .iter()
        .filter(|row| {
            !RawTable::is_missing(&row[city])
                && heuristics::is_state(&row[state])
                && heuristics::is_zip(&row[zip])
        })
        .count();
    hits as f64 / table.row_count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::composite::{CSZ_CITY, CSZ_STATE, CSZ_ZIP};

    fn dealer_table() -> RawTable {
        RawTable::from_rows(
            &[
                "Store", "Deal #", "First Name", "Last Name", "Address", "City", "State", "Zip",
                "VIN", "Sold Date", "Email",
            ],
            &[
                &[
                    "Sunrise Toyota", "1001", "John", "Smith", "123 Main St", "Austin", "TX",
                    "73301", "1FTFW1E50PFA00001", "01/05/2024", "john@example.com",
                ],
                &[
                    "Sunrise Toyota", "1002", "Jane", "Doe", "45 Oak Ave", "Dallas", "TX",
                    "75201", "2T1BURHE0JC000002", "2/10/2024", "jane@example.com",
                ],
                &[
                    "Sunrise Toyota", "1003", "Bob", "Lee", "9 Pine Rd", "Houston", "TX", "77002",
                    "3VWFE21C04M000003", "3/15/2024", "",
                ],
            ],
        )
    }

    #[test]
    fn test_detects_typical_export() {
        let detection = SchemaDetector::new().detect(&dealer_table()).unwrap();
        let m = &detection.mapping;

        assert_eq!(m.column_name(CanonicalField::Store), Some("Store"));
        assert_eq!(m.column_name(CanonicalField::DealNumber), Some("Deal #"));
        assert_eq!(m.column_name(CanonicalField::FirstName), Some("First Name"));
        assert_eq!(m.column_name(CanonicalField::LastName), Some("Last Name"));
        assert_eq!(m.column_name(CanonicalField::Address1), Some("Address"));
        assert_eq!(m.column_name(CanonicalField::City), Some("City"));
        assert_eq!(m.column_name(CanonicalField::State), Some("State"));
        assert_eq!(m.column_name(CanonicalField::Zip), Some("Zip"));
        assert_eq!(m.column_name(CanonicalField::Vin), Some("VIN"));
        assert_eq!(m.column_name(CanonicalField::DeliveryDate), Some("Sold Date"));
        assert_eq!(m.column_name(CanonicalField::Email), Some("Email"));
        assert!(detection.composite_sources.is_empty());
    }

    #[test]
    fn test_composite_column_maps_to_split_columns() {
        let table = RawTable::from_rows(
            &["Customer Name", "Street", "City/State/Zip", "VIN", "Sold Date"],
            &[
                &[
                    "John Smith", "123 Main St", "Austin, TX 73301", "1FTFW1E50PFA00001",
                    "2024-01-05",
                ],
                &[
                    "Jane Doe", "45 Oak Ave", "Dallas TX 75201", "2T1BURHE0JC000002",
                    "2024-02-10",
                ],
            ],
        );
        let detection = SchemaDetector::new().detect(&table).unwrap();
        let m = &detection.mapping;

        assert_eq!(m.column_name(CanonicalField::City), Some(CSZ_CITY));
        assert_eq!(m.column_name(CanonicalField::State), Some(CSZ_STATE));
        assert_eq!(m.column_name(CanonicalField::Zip), Some(CSZ_ZIP));
        assert!(m.get(CanonicalField::Zip).unwrap().synthetic);
        assert_eq!(m.column_name(CanonicalField::Address1), Some("Street"));

        let city = detection.table.column_index(CSZ_CITY).unwrap();
        let state = detection.table.column_index(CSZ_STATE).unwrap();
        let zip = detection.table.column_index(CSZ_ZIP).unwrap();
        assert_eq!(detection.table.get(0, city), Some("Austin"));
        assert_eq!(detection.table.get(0, state), Some("TX"));
        assert_eq!(detection.table.get(0, zip), Some("73301"));
        assert!(detection.warnings.iter().any(|w| w.contains(CSZ_ZIP)));
    }

    /// Columns named c1..cN so only cell contents can drive the mapping.
    fn unlabeled(columns: &[&[&str]]) -> RawTable {
        let headers = (1..=columns.len()).map(|i| format!("c{i}")).collect();
        let rows = (0..columns[0].len())
            .map(|r| columns.iter().map(|c| c[r].to_string()).collect())
            .collect();
        RawTable::new(headers, rows)
    }

    const STREETS: &[&str] = &["123 Main St", "45 Oak Ave", "9 Pine Rd", "77 Elm Dr"];
    const CITIES: &[&str] = &["Austin", "Dallas", "Houston", "El Paso"];
    const STATES: &[&str] = &["TX", "TX", "TX", "TX"];
    const ZIPS: &[&str] = &["73301", "75201", "77002", "79901"];

    fn score_of(detection: &Detection, field: CanonicalField, column: &str) -> Option<f64> {
        detection
            .mapping
            .alternatives(field)
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.score)
    }

    #[test]
    fn test_unlabeled_address_columns_detected_from_values() {
        let table = unlabeled(&[STREETS, CITIES, STATES, ZIPS]);
        let detection = SchemaDetector::new().detect(&table).unwrap();
        let m = &detection.mapping;

        assert_eq!(m.column_name(CanonicalField::Address1), Some("c1"));
        assert_eq!(m.column_name(CanonicalField::City), Some("c2"));
        assert_eq!(m.column_name(CanonicalField::State), Some("c3"));
        assert_eq!(m.column_name(CanonicalField::Zip), Some("c4"));
        assert_eq!(score_of(&detection, CanonicalField::Zip, "c4"), Some(100.0));
    }

    #[test]
    fn test_make_column_is_not_a_city() {
        let makes: &[&str] = &["Toyota", "Honda", "Ford", "Nissan"];
        let table = unlabeled(&[STREETS, makes, CITIES, STATES, ZIPS]);
        let detection = SchemaDetector::new().detect(&table).unwrap();

        assert_eq!(detection.mapping.column_name(CanonicalField::City), Some("c3"));
        // 80 + 20 + 20 - 60 falls below the candidate threshold
        assert_eq!(score_of(&detection, CanonicalField::City, "c2"), None);
        assert_eq!(score_of(&detection, CanonicalField::City, "c3"), Some(120.0));
    }

    #[test]
    fn test_low_cardinality_city_penalty_and_header_agreement() {
        let cities = ["Austin", "Dallas", "Houston", "Waco", "Tyler"];
        let rows = (0..20)
            .map(|i| {
                vec![
                    cities[i % cities.len()].to_string(),
                    "TX".to_string(),
                    format!("7330{}", i % 10),
                ]
            })
            .collect();
        let table = RawTable::new(vec!["City".into(), "State".into(), "Zip".into()], rows);
        let detection = SchemaDetector::new().detect(&table).unwrap();

        assert_eq!(detection.mapping.column_name(CanonicalField::City), Some("City"));
        // value-driven 120 plus the agreement bonus for a matching header
        assert_eq!(score_of(&detection, CanonicalField::City, "City"), Some(130.0));
        // a constant column loses 20 points for low cardinality
        assert_eq!(score_of(&detection, CanonicalField::City, "State"), Some(100.0));
        assert_eq!(score_of(&detection, CanonicalField::Zip, "Zip"), Some(110.0));
    }

    #[test]
    fn test_identical_columns_are_ambiguous() {
        let table = RawTable::from_rows(
            &["Zip", "Postal Code"],
            &[&["73301", "73301"], &["75201", "75201"]],
        );
        let err = SchemaDetector::new().detect(&table).unwrap_err();
        match err {
            SiftError::Ambiguity { field, .. } => assert_eq!(field, CanonicalField::Zip),
            other => panic!("expected ambiguity, got {other}"),
        }
    }

    #[test]
    fn test_near_tie_broken_by_non_null_count() {
        let table = RawTable::from_rows(
            &["Zip", "Postal Code"],
            &[&["73301", "73301"], &["", "75201"]],
        );
        let detection = SchemaDetector::new().detect(&table).unwrap();
        assert_eq!(detection.mapping.column_name(CanonicalField::Zip), Some("Postal Code"));
    }

    #[test]
    fn test_vin_gate_rejects_non_vins() {
        let table = RawTable::from_rows(
            &["VIN", "Last Name"],
            &[&["ABC", "Smith"], &["123", "Doe"]],
        );
        let err = SchemaDetector::new().detect(&table).unwrap_err();
        match err {
            SiftError::LowConfidence { field, metric, value, .. } => {
                assert_eq!(field, CanonicalField::Vin);
                assert_eq!(metric, "vin_rate");
                assert_eq!(value, 0.0);
            }
            other => panic!("expected low confidence, got {other}"),
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let table = RawTable::from_rows(&["VIN"], &[]);
        let err = SchemaDetector::new().detect(&table).unwrap_err();
        assert!(matches!(err, SiftError::EmptyInput(_)));
    }

    #[test]
    fn test_date_precedence_skips_negative_headers() {
        let matcher = HeaderMatcher::new();
        assert_eq!(date_precedence("sold date"), Some(1));
        assert_eq!(date_precedence("deliverydate"), Some(3));
        assert_eq!(date_precedence("update time"), None);
        assert!(is_date_header(&matcher, "contract date"));
        assert!(!is_date_header(&matcher, "birth date"));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = SchemaDetector::new();
        let a = detector.detect(&dealer_table()).unwrap();
        let b = detector.detect(&dealer_table()).unwrap();
        assert_eq!(
            a.mapping.iter().map(|(f, c)| (f, c.index)).collect::<Vec<_>>(),
            b.mapping.iter().map(|(f, c)| (f, c.index)).collect::<Vec<_>>()
        );
    }
}
