use crate::domain::model::PostalCode;
use regex::Regex;
use std::sync::LazyLock;

// `\d` would also accept non-ASCII digits.
static POSTAL_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{5})-?([0-9]{3})$").expect("valid postal code pattern"));

/// Normalizes raw user input into an 8-digit postal code.
///
/// Accepts exactly `NNNNNNNN` or `NNNNN-NNN`; surrounding whitespace is
/// not stripped.
/// Returns `None` for absent or empty input, and for anything else that does
/// not match; the latter is logged as a warning. This never errors: callers
/// decide how to surface a `None`.
pub fn normalize(raw: Option<&str>) -> Option<PostalCode> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    match POSTAL_CODE_PATTERN.captures(raw) {
        Some(caps) => {
            let digits = format!("{}{}", &caps[1], &caps[2]);
            Some(PostalCode::from_digits(digits))
        }
        None => {
            tracing::warn!("Rejected postal code input: {:?}", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> Option<String> {
        normalize(Some(raw)).map(|code| code.as_str().to_string())
    }

    #[test]
    fn test_accepts_bare_and_hyphenated() {
        assert_eq!(norm("01001000").as_deref(), Some("01001000"));
        assert_eq!(norm("99999-999").as_deref(), Some("99999999"));
    }

    #[test]
    fn test_empty_or_absent_is_none() {
        assert!(normalize(None).is_none());
        assert!(norm("").is_none());
    }

    #[test]
    fn test_surrounding_whitespace_is_rejected() {
        for raw in [" 01001000", "01001000 ", "  01001-000\n", "   ", "01001 000"] {
            assert!(norm(raw).is_none(), "expected {:?} to be rejected", raw);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in [
            "0100100",
            "010010000",
            "0100-1000",
            "01001--000",
            "01001_000",
            "abcdefgh",
            "01001-00a",
            "٠١٠٠١٠٠٠",
        ] {
            assert!(norm(raw).is_none(), "expected {:?} to be rejected", raw);
        }
    }
}
