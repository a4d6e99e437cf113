//! Header normalization and header-to-field scoring.

use similar::TextDiff;

use crate::schema::catalog::{FUZZY_STRONG, POSITIVE_BONUS};
use crate::schema::{CanonicalField, ValueCheck, FIELD_RULES};

/// Lowercase, turn non-alphanumeric runs into single spaces, trim.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;
    for c in label.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

fn compact(normalized: &str) -> String {
    normalized.split(' ').collect()
}

/// Whether a normalized header contains a normalized keyword on token
/// boundaries. Adjacent header tokens may be joined, so `address 1`
/// contains `address1` and `cobuyer` contains `co buyer`, but `company`
/// does not contain `co`.
pub fn contains_keyword(header: &str, keyword: &str) -> bool {
    let wanted = compact(keyword);
    if wanted.is_empty() {
        return false;
    }
    let tokens: Vec<&str> = header.split(' ').filter(|t| !t.is_empty()).collect();
    for start in 0..tokens.len() {
        let mut joined = String::new();
        for token in &tokens[start..] {
            joined.push_str(token);
            if joined.len() >= wanted.len() {
                if joined == wanted {
                    return true;
                }
                break;
            }
        }
    }
    false
}

/// Character similarity of two strings, 0-100.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    f64::from(TextDiff::from_chars(a, b).ratio()) * 100.0
}

/// Token-set similarity, 0-100.
///
/// Shared tokens are compared against each side's full sorted token list;
/// a header whose tokens are a subset of the other side scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let mut tokens_a: Vec<&str> = a.split_whitespace().collect();
    let mut tokens_b: Vec<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    tokens_a.sort_unstable();
    tokens_a.dedup();
    tokens_b.sort_unstable();
    tokens_b.dedup();

    let shared: Vec<&str> = tokens_a.iter().filter(|t| tokens_b.contains(t)).copied().collect();
    let only_a: Vec<&str> = tokens_a.iter().filter(|t| !shared.contains(t)).copied().collect();
    let only_b: Vec<&str> = tokens_b.iter().filter(|t| !shared.contains(t)).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let sect = shared.join(" ");
    let diff_a = only_a.join(" ");
    let diff_b = only_b.join(" ");

    let mut best = ratio(&diff_a, &diff_b);
    if !sect.is_empty() {
        let full_a = format!("{} {}", sect, diff_a);
        let full_b = format!("{} {}", sect, diff_b);
        best = best
            .max(ratio(&sect, &full_a))
            .max(ratio(&sect, &full_b))
            .max(ratio(&full_a, &full_b));
    }
    best
}

/// A field rule with its keywords normalized.
#[derive(Debug)]
struct CompiledRule {
    field: CanonicalField,
    synonyms: Vec<String>,
    negatives: Vec<String>,
    negative_penalty: f64,
    positives: Vec<String>,
    check: ValueCheck,
}

/// Scores normalized headers against every canonical field.
#[derive(Debug)]
pub struct HeaderMatcher {
    rules: Vec<CompiledRule>,
}

impl HeaderMatcher {
    /// Compile the rule table.
    pub fn new() -> Self {
        let normalize_all = |words: &[&str]| -> Vec<String> {
            words
                .iter()
                .map(|w| normalize_label(w))
                .filter(|w| !w.is_empty())
                .collect()
        };

        let rules = FIELD_RULES
            .iter()
            .map(|rule| {
                let mut synonyms = normalize_all(rule.synonyms);
                synonyms.push(normalize_label(rule.field.name()));
                synonyms.sort();
                synonyms.dedup();
                CompiledRule {
                    field: rule.field,
                    synonyms,
                    negatives: normalize_all(rule.negatives),
                    negative_penalty: rule.negative_penalty,
                    positives: normalize_all(rule.positives),
                    check: rule.check,
                }
            })
            .collect();

        Self { rules }
    }

    fn rule(&self, field: CanonicalField) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Header score of a normalized header for a field, 0-100.
    ///
    /// An exact synonym match (ignoring spaces) scores [`FUZZY_STRONG`] and
    /// is final. Otherwise the best token-set similarity is adjusted by the
    /// field's negative and positive keywords.
    pub fn header_score(&self, field: CanonicalField, header: &str) -> f64 {
        let Some(rule) = self.rule(field) else {
            return 0.0;
        };
        if header.is_empty() {
            return 0.0;
        }

        let header_compact = compact(header);
        if rule
            .synonyms
            .iter()
            .any(|s| s == header || compact(s) == header_compact)
        {
            return FUZZY_STRONG;
        }

        let mut score = rule
            .synonyms
            .iter()
            .map(|s| token_set_ratio(header, s))
            .fold(0.0, f64::max);

        if self.has_negative(field, header) {
            score = (score - rule.negative_penalty).max(0.0);
        }
        if rule.positives.iter().any(|p| contains_keyword(header, p)) {
            score = (score + POSITIVE_BONUS).min(100.0);
        }
        score
    }

    /// Whether the header contains one of the field's negative keywords.
    pub fn has_negative(&self, field: CanonicalField, header: &str) -> bool {
        self.rule(field)
            .is_some_and(|r| r.negatives.iter().any(|n| contains_keyword(header, n)))
    }

    /// Penalty to apply to a value-driven candidate with this header.
    pub fn negative_penalty(&self, field: CanonicalField, header: &str) -> f64 {
        match self.rule(field) {
            Some(rule) if self.has_negative(field, header) => rule.negative_penalty,
            _ => 0.0,
        }
    }

    /// The value check configured for a field.
    pub fn value_check(&self, field: CanonicalField) -> ValueCheck {
        self.rule(field).map(|r| r.check).unwrap_or(ValueCheck::None)
    }
}

impl Default for HeaderMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Delivery_Date (Sold) "), "delivery date sold");
        assert_eq!(normalize_label("City/State/Zip"), "city state zip");
        assert_eq!(normalize_label("E-Mail"), "e mail");
        assert_eq!(normalize_label("###"), "");
    }

    #[test]
    fn test_contains_keyword_respects_token_boundaries() {
        assert!(contains_keyword("co buyer first", "co"));
        assert!(contains_keyword("cobuyer city", "co buyer"));
        assert!(contains_keyword("address 1", "address1"));
        assert!(!contains_keyword("company name", "co"));
        assert!(!contains_keyword("mileage", "miles"));
    }

    #[test]
    fn test_token_set_ratio() {
        assert_eq!(token_set_ratio("last name", "name"), 100.0);
        assert_eq!(token_set_ratio("zip", "zip"), 100.0);
        assert!(token_set_ratio("deal number", "dealer") < 80.0);
        assert_eq!(token_set_ratio("", "zip"), 0.0);
    }

    #[test]
    fn test_exact_synonym_is_strong() {
        let matcher = HeaderMatcher::new();
        assert_eq!(matcher.header_score(CanonicalField::Zip, "zip code"), FUZZY_STRONG);
        assert_eq!(matcher.header_score(CanonicalField::Address2, "address 2"), FUZZY_STRONG);
        assert_eq!(matcher.header_score(CanonicalField::Vin, "vin"), FUZZY_STRONG);
        // field name itself counts as a synonym
        assert_eq!(matcher.header_score(CanonicalField::DealNumber, "deal number"), FUZZY_STRONG);
    }

    #[test]
    fn test_negative_keywords_penalize() {
        let matcher = HeaderMatcher::new();
        // "city" is a subset match, the co-buyer keyword costs 30
        assert_eq!(matcher.header_score(CanonicalField::City, "co buyer city"), 70.0);
        assert_eq!(matcher.header_score(CanonicalField::Vin, "vin list"), 70.0);
        assert!(matcher.header_score(CanonicalField::Address2, "address 1") < 80.0);
    }

    #[test]
    fn test_positive_keyword_bonus_is_capped() {
        let matcher = HeaderMatcher::new();
        assert_eq!(matcher.header_score(CanonicalField::Address1, "street line 1"), 100.0);
    }
}
