//! Value heuristics over sampled cells.
//!
//! All predicates take a trimmed cell value. Rates are fractions of a
//! sample in `0.0..=1.0`; an empty sample always rates `0.0`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::RawTable;
use crate::lexicon;
use crate::schema::ValueCheck;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static VIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").unwrap()
});

static US_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\+1[-.\s]?)?(?:\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4})\b").unwrap()
});

static ZIP_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").unwrap());

static ZIP_EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d{5}(?:-\d{4})?|\d{9})$").unwrap());

static CITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z\-\s\.']+$").unwrap());

static STREET_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+\s+|P\.?O\.?\s*BOX\b)").unwrap());

static PO_BOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bP\.?O\.?\s*BOX\b|\bPO\s*BOX\b").unwrap());

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap());

/// Date layouts seen in dealer exports. Two-digit-year layouts come first so
/// `1/5/23` is not read as year 23.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

/// Plausible model-year range for value scoring.
pub const MODEL_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1980..=2030;

// =============================================================================
// SAMPLING
// =============================================================================

/// Up to `max` non-missing, trimmed values from a column, in row order.
pub fn sample_column(table: &RawTable, col: usize, max: usize) -> Vec<&str> {
    table
        .column_values(col)
        .map(str::trim)
        .filter(|v| !RawTable::is_missing(v))
        .take(max)
        .collect()
}

/// Fraction of the sample satisfying `pred`.
pub fn rate(sample: &[&str], pred: impl Fn(&str) -> bool) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().filter(|v| pred(**v)).count() as f64 / sample.len() as f64
}

// =============================================================================
// PREDICATES
// =============================================================================

/// Strict 17-character VIN check on the trimmed, upper-cased value.
pub fn is_valid_vin(value: &str) -> bool {
    VIN.is_match(&value.trim().to_ascii_uppercase())
}

pub fn contains_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn contains_phone(value: &str) -> bool {
    US_PHONE.is_match(value)
}

pub fn contains_zip(value: &str) -> bool {
    ZIP_ANYWHERE.is_match(value)
}

/// Five digits, ZIP+4, or nine bare digits.
pub fn is_zip(value: &str) -> bool {
    ZIP_EXACT.is_match(value.trim())
}

pub fn is_state(value: &str) -> bool {
    lexicon::is_state_abbr(&value.trim().to_ascii_uppercase())
}

/// Alphabetic words with spaces, hyphens, dots or apostrophes.
pub fn is_city(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && CITY.is_match(v)
}

/// House-number start, PO box, or a street-type token.
pub fn is_street(value: &str) -> bool {
    let v = value.trim().to_ascii_uppercase();
    if v.is_empty() {
        return false;
    }
    if STREET_START.is_match(&v) {
        return true;
    }
    v.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|tok| lexicon::STREET_SUFFIXES.contains(&tok))
}

pub fn is_po_box(value: &str) -> bool {
    PO_BOX.is_match(value)
}

pub fn is_oem(value: &str) -> bool {
    lexicon::is_oem(&value.trim().to_ascii_uppercase())
}

/// Parse a number, ignoring thousands separators and spaces.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if !NUMBER.is_match(&cleaned) {
        return None;
    }
    cleaned.parse().ok()
}

pub fn is_numeric(value: &str) -> bool {
    parse_number(value).is_some()
}

/// Strict integer model year.
pub fn parse_model_year(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn is_plausible_year(value: &str) -> bool {
    parse_model_year(value).is_some_and(|y| MODEL_YEAR_RANGE.contains(&y))
}

/// Parse a date in any of the common export layouts.
///
/// Datetime values are reduced to their date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Some(date) = parse_date_only(v) {
        return Some(date);
    }
    // "2023-01-05 14:30:00", "2023-01-05T14:30:00", "1/5/2023 2:30 PM"
    let head = v.split(['T', ' ']).next()?;
    if head.len() < v.len() && v[head.len()..].contains(':') {
        return parse_date_only(head);
    }
    None
}

fn parse_date_only(v: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(v, fmt).ok())
        .find(|d| (1900..=2100).contains(&chrono::Datelike::year(d)))
}

// =============================================================================
// SCORING
// =============================================================================

/// Value-content score for a field's value check over a sample.
pub fn value_score(check: ValueCheck, sample: &[&str]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    match check {
        ValueCheck::None => 0.0,
        ValueCheck::Vin => {
            let hits = sample.iter().filter(|v| is_valid_vin(v)).count();
            if hits as f64 / sample.len() as f64 >= 0.01 {
                4.0
            } else if hits > 0 {
                2.0
            } else {
                0.0
            }
        }
        ValueCheck::Email => any_hit(sample, contains_email, 3.0),
        ValueCheck::Phone => any_hit(sample, contains_phone, 2.0),
        ValueCheck::Zip => any_hit(sample, contains_zip, 2.0),
        ValueCheck::Numeric => 2.0 * rate(sample, is_numeric),
        ValueCheck::ModelYear => 2.0 * rate(sample, is_plausible_year),
        ValueCheck::Date => 2.0 * rate(sample, |v| parse_date(v).is_some()),
    }
}

fn any_hit(sample: &[&str], pred: fn(&str) -> bool, score: f64) -> f64 {
    if sample.iter().any(|v| pred(*v)) {
        score
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_is_strict() {
        assert!(is_valid_vin("1FTFW1E50PFA00001"));
        assert!(is_valid_vin(" 1ftfw1e50pfa00001 "));
        // I, O and Q never appear in a VIN
        assert!(!is_valid_vin("1FTFW1E50PFA0000I"));
        assert!(!is_valid_vin("1FTFW1E50PFA0000"));
        assert!(!is_valid_vin("1FTFW1E50PFA00001X"));
    }

    #[test]
    fn test_zip_forms() {
        assert!(is_zip("90210"));
        assert!(is_zip("90210-1234"));
        assert!(is_zip("902101234"));
        assert!(!is_zip("9021"));
        assert!(!is_zip("Austin, TX 73301"));
        assert!(contains_zip("Austin, TX 73301"));
    }

    #[test]
    fn test_street_and_city() {
        assert!(is_street("123 Main St"));
        assert!(is_street("PO Box 44"));
        assert!(is_street("Elm Court"));
        assert!(!is_street("Austin"));

        assert!(is_city("San Luis Obispo"));
        assert!(is_city("O'Fallon"));
        assert!(!is_city("123 Main St"));
        assert!(!is_city("A"));
    }

    #[test]
    fn test_po_box_variants() {
        assert!(is_po_box("P.O. Box 12"));
        assert!(is_po_box("po box 12"));
        assert!(is_po_box("POBOX 12"));
        assert!(!is_po_box("Box Elder Rd"));
    }

    #[test]
    fn test_numbers_and_years() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("12 mi"), None);
        assert_eq!(parse_model_year("2019"), Some(2019));
        assert_eq!(parse_model_year("2019.0"), None);
        assert!(is_plausible_year("1999"));
        assert!(!is_plausible_year("1975"));
    }

    #[test]
    fn test_parse_date_layouts() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(parse_date("2023-01-05"), Some(d));
        assert_eq!(parse_date("1/5/2023"), Some(d));
        assert_eq!(parse_date("1/5/23"), Some(d));
        assert_eq!(parse_date("2023-01-05 14:30:00"), Some(d));
        assert_eq!(parse_date("2023-01-05T14:30:00"), Some(d));
        assert_eq!(parse_date("Jan 5, 2023"), Some(d));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("12345"), None);
    }

    #[test]
    fn test_value_scores() {
        let vins = ["1FTFW1E50PFA00001", "nope"];
        assert_eq!(value_score(ValueCheck::Vin, &vins), 4.0);
        assert_eq!(value_score(ValueCheck::Email, &["a@b.com", "x"]), 3.0);
        assert_eq!(value_score(ValueCheck::Numeric, &["12", "abc"]), 1.0);
        assert_eq!(value_score(ValueCheck::Date, &[]), 0.0);
        assert_eq!(value_score(ValueCheck::None, &["anything"]), 0.0);
    }

    #[test]
    fn test_sample_skips_missing_and_trims() {
        let table = RawTable::from_rows(&["A"], &[&[" x "], &[""], &["NULL"], &["y"]]);
        assert_eq!(sample_column(&table, 0, 500), vec!["x", "y"]);
        assert_eq!(sample_column(&table, 0, 1), vec!["x"]);
    }
}
