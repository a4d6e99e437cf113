//! Phone number normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:ext\.?|x)\s*(\d{1,5})$").unwrap());

/// Normalize a phone number.
///
/// Keeps the last ten digits, formats ten as `AAA-NNN-NNNN` and seven as
/// `NNN-NNNN`, and re-appends a trailing extension as ` x123`. A seven-digit
/// number takes `area_code` when that is exactly three digits. Other digit
/// counts are returned as bare digits. Returns an empty string when the
/// text holds no digits.
pub fn normalize_phone(raw: &str, area_code: Option<&str>) -> String {
    let text = raw.trim();
    let (body, extension) = match EXTENSION.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            let ext = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            (&text[..start], Some(ext))
        }
        None => (text, None),
    };

    let mut digits: String = body.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    if digits.len() >= 10 {
        digits = digits[digits.len() - 10..].to_string();
    }
    if digits.len() == 7 {
        if let Some(area) = area_code.map(area_digits).filter(|a| a.len() == 3) {
            digits = format!("{area}{digits}");
        }
    }

    let mut out = match digits.len() {
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => digits,
    };
    if let Some(ext) = extension {
        out.push_str(" x");
        out.push_str(ext);
    }
    out
}

fn area_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
