//! Combined "City/State/Zip" column detection and splitting.

use once_cell::sync::Lazy;
use regex::Regex;

use super::header::normalize_label;
use crate::input::RawTable;
use crate::lexicon::COMPOSITE_CSZ_HEADERS;

/// Synthetic column holding the city part of composite columns.
pub const CSZ_CITY: &str = "__CSZ_City";
/// Synthetic column holding the state part of composite columns.
pub const CSZ_STATE: &str = "__CSZ_State";
/// Synthetic column holding the zip part of composite columns.
pub const CSZ_ZIP: &str = "__CSZ_Zip";

/// Values inspected when sniffing a column for composite content.
const SNIFF_ROWS: usize = 200;
/// Share of sniffed values that must look composite.
const SNIFF_RATE: f64 = 0.3;

static COMPOSITE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z].*,?\s*[A-Za-z]{2}\s+\d{5}(?:-\d{4})?").unwrap());

static TRAILING_ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{5})(?:-\d{4})?$").unwrap());

static CITY_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<city>[A-Za-z][A-Za-z \-\.'/]*)[,\s]+(?P<st>[A-Za-z]{2})$").unwrap()
});

static STATE_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").unwrap());

static CITY_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z \-\.'/]*$").unwrap());

/// Labels that sometimes precede a zip and are never a city.
const ZIP_LABELS: &[&str] = &["ZIP", "ZIP CODE", "POSTAL", "POSTAL CODE"];

/// City, state and zip parsed out of one composite value. Missing parts
/// are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CszParts {
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl CszParts {
    fn new(city: &str, state: &str, zip: &str) -> Self {
        Self {
            city: city.trim().to_string(),
            state: state.trim().to_ascii_uppercase(),
            zip: zip.to_string(),
        }
    }
}

/// Split one composite value.
///
/// Handles `City, ST 12345`, `City ST 12345`, `City, ST`, `ST 12345` and
/// `City 12345`, falling back to comma and then whitespace splits with a
/// trailing two-letter state.
pub fn split_csz_value(text: &str) -> CszParts {
    let t = text.trim();
    if t.is_empty() {
        return CszParts::default();
    }

    let (zip, rest) = match TRAILING_ZIP.captures(t) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(t.len());
            let zip = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            (zip, t[..whole].trim())
        }
        None => ("", t),
    };

    if !zip.is_empty() && ZIP_LABELS.contains(&rest.to_ascii_uppercase().as_str()) {
        return CszParts::new("", "", zip);
    }

    if let Some(caps) = CITY_STATE.captures(rest) {
        return CszParts::new(&caps["city"], &caps["st"], zip);
    }

    if !zip.is_empty() && STATE_ONLY.is_match(rest) {
        return CszParts::new("", rest, zip);
    }

    if !zip.is_empty() && CITY_ONLY.is_match(rest) {
        let city = rest.trim();
        let upper = city.to_ascii_uppercase();
        if ZIP_LABELS.contains(&upper.as_str()) || upper == "CITY" || upper == "STATE" {
            return CszParts::new("", "", zip);
        }
        return CszParts::new(city, "", zip);
    }

    if rest.contains(',') {
        let parts: Vec<&str> = rest.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        if let Some((last, init)) = parts.split_last() {
            if !init.is_empty() && STATE_ONLY.is_match(last) {
                return CszParts::new(&init.join(", "), last, zip);
            }
        }
    }

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if let Some((last, init)) = tokens.split_last() {
        if !init.is_empty() && STATE_ONLY.is_match(last) {
            return CszParts::new(&init.join(" "), last, zip);
        }
    }

    CszParts::new("", "", zip)
}

/// Whether a header names one of the synthetic split columns.
pub fn is_synthetic(header: &str) -> bool {
    header == CSZ_CITY || header == CSZ_STATE || header == CSZ_ZIP
}

/// Whether a normalized header names a combined City/State/Zip column.
pub fn is_composite_header(normalized: &str) -> bool {
    COMPOSITE_CSZ_HEADERS.iter().any(|k| normalized.contains(k))
}

/// Columns holding combined City/State/Zip values, by header or content.
pub fn find_composite_columns(table: &RawTable) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !is_synthetic(header))
        .filter(|(idx, header)| {
            if is_composite_header(&normalize_label(header)) {
                return true;
            }
            let sample: Vec<&str> = table
                .column_values(*idx)
                .filter(|v| !RawTable::is_missing(v))
                .take(SNIFF_ROWS)
                .collect();
            !sample.is_empty()
                && sample.iter().filter(|v| COMPOSITE_VALUE.is_match(v)).count() as f64
                    / sample.len() as f64
                    >= SNIFF_RATE
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Result of splitting composite columns.
#[derive(Debug, Clone)]
pub struct CompositeSplit {
    /// The input table with synthetic columns appended.
    pub table: RawTable,
    /// Source columns that were split.
    pub sources: Vec<usize>,
}

/// Split every composite column and append the synthetic columns.
///
/// When several composite columns exist, each row takes the first
/// non-empty part in column order. A synthetic column is only added when
/// at least one row has a value for it.
pub fn split_composites(table: &RawTable) -> CompositeSplit {
    let sources = find_composite_columns(table);
    if sources.is_empty() {
        return CompositeSplit {
            table: table.clone(),
            sources,
        };
    }

    let rows = table.row_count();
    let mut city = vec![String::new(); rows];
    let mut state = vec![String::new(); rows];
    let mut zip = vec![String::new(); rows];

    for &col in &sources {
        for (row, value) in table.column_values(col).enumerate() {
            let parts = split_csz_value(value);
            fill_if_empty(&mut city[row], parts.city);
            fill_if_empty(&mut state[row], parts.state);
            fill_if_empty(&mut zip[row], parts.zip);
        }
    }

    let mut out = table.clone();
    for (name, values) in [(CSZ_CITY, city), (CSZ_STATE, state), (CSZ_ZIP, zip)] {
        if values.iter().any(|v| !v.is_empty()) {
            out = out.with_column(name, values);
        }
    }

    log::debug!(
        "split {} composite column(s): {:?}",
        sources.len(),
        sources.iter().map(|&i| &table.headers[i]).collect::<Vec<_>>()
    );

    CompositeSplit { table: out, sources }
}

fn fill_if_empty(slot: &mut String, value: String) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
    }
}
