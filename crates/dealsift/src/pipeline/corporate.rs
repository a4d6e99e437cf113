//! Business-name detection for the corporate exclusion stage.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::lexicon::{CORPORATE_BRANDS, CORPORATE_KEYWORDS, CORPORATE_SUFFIXES, OEMS};

/// Score at or above which a row is excluded.
pub const EXCLUDE_THRESHOLD: i32 = 3;
/// Deducted when first and last name both look like a person's name.
pub const PERSON_NAME_CREDIT: i32 = 3;

/// Word lists a name is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorporateList {
    Brand,
    Oem,
    Keyword,
    Suffix,
}

impl CorporateList {
    fn weight(self) -> i32 {
        match self {
            CorporateList::Brand => 3,
            CorporateList::Oem | CorporateList::Keyword | CorporateList::Suffix => 2,
        }
    }
}

static LISTS: Lazy<Vec<(CorporateList, Vec<Vec<String>>)>> = Lazy::new(|| {
    let tokenize_all =
        |entries: &[&str]| -> Vec<Vec<String>> { entries.iter().map(|e| tokenize(e)).collect() };
    vec![
        (CorporateList::Brand, tokenize_all(CORPORATE_BRANDS)),
        (CorporateList::Oem, tokenize_all(OEMS)),
        (CorporateList::Keyword, tokenize_all(CORPORATE_KEYWORDS)),
        (CorporateList::Suffix, tokenize_all(CORPORATE_SUFFIXES)),
    ]
});

fn tokenize(text: &str) -> Vec<String> {
    text.to_ascii_uppercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `needle` occurs as a contiguous run of whole tokens.
fn contains_tokens(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Lists with at least one entry in the text.
pub fn list_hits(text: &str) -> Vec<CorporateList> {
    let tokens = tokenize(text);
    LISTS
        .iter()
        .filter(|(_, entries)| entries.iter().any(|e| contains_tokens(&tokens, e)))
        .map(|(list, _)| *list)
        .collect()
}

/// A single capitalized word such as `Smith`.
pub fn is_title_case_name(word: &str) -> bool {
    let word = word.trim();
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && !word.contains(char::is_whitespace)
        && chars.all(|c| c.is_lowercase() || c == '\'' || c == '-')
}

/// Corporate verdict for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorporateVerdict {
    pub score: i32,
    pub forced: bool,
}

impl CorporateVerdict {
    pub fn excluded(&self) -> bool {
        self.forced || self.score >= EXCLUDE_THRESHOLD
    }
}

/// Score a row's name texts.
///
/// Each distinct text contributes the weights of the lists it hits. Any
/// hit in the full name or the first-plus-last text forces exclusion.
/// The score is kept for reporting and for callers that only want the
/// weighted verdict.
pub fn score_names(
    full_name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> CorporateVerdict {
    let joined = [first_name, last_name]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let mut texts: Vec<String> = Vec::with_capacity(2);
    for text in [full_name.unwrap_or(""), joined.as_str()] {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() && !texts.iter().any(|t| t.eq_ignore_ascii_case(&text)) {
            texts.push(text);
        }
    }

    let mut score = 0;
    let mut forced = false;
    for text in &texts {
        let hits = list_hits(text);
        forced |= !hits.is_empty();
        score += hits.iter().map(|l| l.weight()).sum::<i32>();
    }

    let person = matches!(
        (first_name, last_name),
        (Some(f), Some(l)) if is_title_case_name(f) && is_title_case_name(l)
    );
    if person {
        score -= PERSON_NAME_CREDIT;
    }

    CorporateVerdict { score, forced }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_forces_exclusion() {
        let verdict = score_names(Some("ABC Motors LLC"), None, None);
        assert!(verdict.forced);
        assert!(verdict.excluded());
    }

    #[test]
    fn test_person_is_kept() {
        let verdict = score_names(Some("John Smith"), Some("John"), Some("Smith"));
        assert_eq!(verdict.score, -3);
        assert!(!verdict.excluded());
    }

    #[test]
    fn test_single_keyword_forces_exclusion() {
        let verdict = score_names(Some("Smith Motors"), None, None);
        assert_eq!(verdict.score, 2);
        assert!(verdict.forced);
        assert!(verdict.excluded());
    }

    #[test]
    fn test_keyword_in_last_name_overrides_person_credit() {
        let verdict = score_names(None, Some("Jones"), Some("Auto"));
        assert_eq!(verdict.score, -1);
        assert!(verdict.excluded());
    }

    #[test]
    fn test_oem_surname_is_forced() {
        let verdict = score_names(None, Some("Harrison"), Some("Ford"));
        assert!(verdict.forced);
        assert!(verdict.excluded());
    }

    #[test]
    fn test_single_brand_forces_exclusion() {
        let verdict = score_names(Some("HERTZ"), None, None);
        assert_eq!(verdict.score, 3);
        assert!(verdict.forced);
    }

    #[test]
    fn test_two_lists_force_exclusion() {
        // OEM and keyword in one text
        let verdict = score_names(Some("Toyota Sales"), None, None);
        assert!(verdict.forced);
    }

    #[test]
    fn test_token_boundaries() {
        assert!(list_hits("Coco Jones").is_empty());
        assert_eq!(list_hits("Smith & Co"), vec![CorporateList::Suffix]);
        assert_eq!(
            list_hits("Group 1 Automotive"),
            vec![CorporateList::Brand, CorporateList::Keyword]
        );
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case_name("Smith"));
        assert!(is_title_case_name("O'neil"));
        assert!(!is_title_case_name("SMITH"));
        assert!(!is_title_case_name("smith"));
        assert!(!is_title_case_name(""));
    }
}
