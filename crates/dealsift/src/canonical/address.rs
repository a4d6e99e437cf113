//! Address assembly helpers and the address grouping key.

use crate::inference::heuristics;
use crate::lexicon::UNIT_TOKENS;

/// Separator between the four address-key parts.
pub const KEY_SEPARATOR: char = '|';

/// Whether text contains a secondary-unit designator (`Apt`, `Suite`, `#`).
pub fn has_unit_token(text: &str) -> bool {
    if text.contains('#') {
        return true;
    }
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .any(|t| UNIT_TOKENS.contains(&t.to_ascii_lowercase().as_str()))
}

/// Resolve Address1/Address2 for one row.
///
/// When both fields come from the same source column, Address2 survives only
/// if it carries a unit token and differs from Address1. A PO-box Address2
/// moves into an empty Address1.
pub fn assemble(
    address1: Option<String>,
    address2: Option<String>,
    same_source: bool,
) -> (Option<String>, Option<String>) {
    let mut address2 = address2;
    if same_source {
        let keep = match (&address1, &address2) {
            (Some(a1), Some(a2)) => has_unit_token(a2) && !a1.eq_ignore_ascii_case(a2),
            (None, Some(a2)) => has_unit_token(a2),
            _ => false,
        };
        if !keep {
            address2 = None;
        }
    }

    match address1 {
        None if address2.as_deref().is_some_and(heuristics::is_po_box) => (address2, None),
        address1 => (address1, address2),
    }
}

/// Upper-case, turn `#` into a unit marker, replace punctuation with spaces
/// and collapse whitespace.
fn clean_tokens(text: &str) -> Vec<String> {
    let upper = text.to_ascii_uppercase().replace('#', " UNIT ");
    upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalized street line: PO-box spellings become `PO BOX`, unit
/// designators become `UNIT`.
pub fn normalize_street(text: &str) -> String {
    let tokens = clean_tokens(text);
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "P" if tokens.get(i + 1).is_some_and(|t| t == "O")
                && tokens.get(i + 2).is_some_and(|t| t == "BOX") =>
            {
                out.extend(["PO", "BOX"]);
                i += 3;
                continue;
            }
            "POBOX" => out.extend(["PO", "BOX"]),
            _ if UNIT_TOKENS.contains(&token.to_ascii_lowercase().as_str()) => out.push("UNIT"),
            _ => out.push(token),
        }
        i += 1;
    }
    out.join(" ")
}

/// Normalized city or state: upper-case, punctuation stripped.
pub fn normalize_locality(text: &str) -> String {
    clean_tokens(text).join(" ")
}

/// First five digits of a zip code.
pub fn zip5(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).take(5).collect()
}

/// Grouping key `STREET|CITY|STATE|ZIP5`, or an empty string when any part
/// normalizes to nothing.
pub fn address_key(address1: &str, city: &str, state: &str, zip: &str) -> String {
    let parts = [
        normalize_street(address1),
        normalize_locality(city),
        normalize_locality(state),
        zip5(zip),
    ];
    if parts.iter().any(String::is_empty) {
        return String::new();
    }
    parts.join(&KEY_SEPARATOR.to_string())
}

/// Re-normalize an existing key. Normalized keys come back unchanged.
pub fn normalize_key(key: &str) -> String {
    let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    match parts.as_slice() {
        [street, city, state, zip] => address_key(street, city, state, zip),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_normalization() {
        assert_eq!(normalize_street("123 Main St., Apt #4"), "123 MAIN ST UNIT UNIT 4");
        assert_eq!(normalize_street("P.O. Box 12"), "PO BOX 12");
        assert_eq!(normalize_street("pobox 12"), "PO BOX 12");
        assert_eq!(normalize_street("  9   Elm  Suite 200 "), "9 ELM UNIT 200");
    }

    #[test]
    fn test_key_requires_every_part() {
        assert_eq!(
            address_key("123 Main St", "San Luis-Obispo", "ca", "93401-1234"),
            "123 MAIN ST|SAN LUIS OBISPO|CA|93401"
        );
        assert_eq!(address_key("123 Main St", "", "CA", "93401"), "");
        assert_eq!(address_key("123 Main St", "Austin", "TX", "n/a"), "");
    }

    #[test]
    fn test_key_normalization_is_idempotent() {
        let key = address_key("P.O. Box 7, Ste. 3", "St. Louis", "mo", "63101");
        assert_eq!(normalize_key(&key), key);
    }

    #[test]
    fn test_state_fl_is_not_a_unit() {
        assert_eq!(address_key("1 Ocean Dr", "Miami", "FL", "33101"), "1 OCEAN DR|MIAMI|FL|33101");
    }

    #[test]
    fn test_same_source_address2_needs_unit_token() {
        let a1 = Some("123 Main St".to_string());
        let (_, a2) = assemble(a1.clone(), a1.clone(), true);
        assert_eq!(a2, None);

        let (_, a2) = assemble(a1.clone(), Some("Apt 4".into()), true);
        assert_eq!(a2.as_deref(), Some("Apt 4"));

        let (_, a2) = assemble(a1, Some("Rear".into()), false);
        assert_eq!(a2.as_deref(), Some("Rear"));
    }

    #[test]
    fn test_po_box_promoted_into_empty_address1() {
        let (a1, a2) = assemble(None, Some("PO Box 44".into()), false);
        assert_eq!(a1.as_deref(), Some("PO Box 44"));
        assert_eq!(a2, None);

        let (a1, a2) = assemble(None, Some("Apt 4".into()), false);
        assert_eq!(a1, None);
        assert_eq!(a2.as_deref(), Some("Apt 4"));
    }
}
