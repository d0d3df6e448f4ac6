//! Input normalization helpers shared by the intake conversation and the
//! vehicle lookup endpoint.

use once_cell::sync::Lazy;
use regex::Regex;

/// Israeli license plates: 7-8 digits after normalization.
static PLATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7,8}$").unwrap());

/// Strip spaces and hyphens and uppercase the rest. "1234-5678" and
/// "12345678" normalize to the same key.
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

pub fn is_valid_plate(normalized: &str) -> bool {
    PLATE_RE.is_match(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spaces_and_hyphens() {
        assert_eq!(normalize_plate("1234-5678"), "12345678");
        assert_eq!(normalize_plate(" 12 34 567 "), "1234567");
    }

    #[test]
    fn dashed_and_plain_plates_share_a_key() {
        assert_eq!(normalize_plate("1234-5678"), normalize_plate("12345678"));
    }

    #[test]
    fn accepts_seven_and_eight_digit_plates() {
        assert!(is_valid_plate("1234567"));
        assert!(is_valid_plate("12345678"));
    }

    #[test]
    fn rejects_wrong_lengths_and_non_digits() {
        assert!(!is_valid_plate("123456"));
        assert!(!is_valid_plate("123456789"));
        assert!(!is_valid_plate("12A4567"));
        assert!(!is_valid_plate(""));
    }
}
