//! Postal code normalization.
//!
//! Vendors and customers write the same locality code in many ways: `"3310"`,
//! `" 03310 "`, `3310` (a JSON number), `"santa-cruz-atoyac-03310"` or
//! `"Roma Norte (06700)"`. Everything is reduced to a single canonical form,
//! exactly five ASCII digits, so that matching is plain string equality.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Slug ending in `-DDDDD`, e.g. `"santa-cruz-atoyac-03310"`.
static SLUG_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-(\d{5})$").unwrap());

/// Parenthesized group, e.g. `"Roma Norte (06700)"`.
static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d{4,5})\)").unwrap());

/// Whole value is the code, e.g. `"3310"`.
static BARE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4,5})$").unwrap());

/// Field names under which structured area records carry their code.
pub const POSTAL_CODE_FIELDS: &[&str] = &[
    "postal_code",
    "postalCode",
    "zip",
    "zipcode",
    "zip_code",
    "zipCode",
    "cp",
    "codigo_postal",
    "code",
];

/// A normalized five-digit postal code.
///
/// The only way to obtain one is through normalization, so every value is
/// guaranteed to be exactly five ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalizes free text into a postal code.
    ///
    /// Whitespace is stripped, then the first run of four or five consecutive
    /// digits is taken and zero-padded to five. Returns `None` when no such
    /// run exists; malformed input is an expected outcome, not an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        first_digit_run(&compact).and_then(Self::from_digits)
    }

    /// Normalizes a numeric code, as found in JSON payloads (`3310`).
    ///
    /// Negative, fractional and out-of-range numbers are invalid.
    pub fn from_number(number: f64) -> Option<Self> {
        if !number.is_finite() || number < 0.0 || number.fract() != 0.0 || number > 99_999.0 {
            return None;
        }
        Self::from_digits(&format!("{}", number as u32))
    }

    /// Normalizes whatever JSON scalar a caller supplied.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => n.as_f64().and_then(Self::from_number),
            _ => None,
        }
    }

    /// Pads a 4–5 digit string to the canonical width.
    fn from_digits(digits: &str) -> Option<Self> {
        let valid = (4..=5).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(format!("{digits:0>5}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid postal code: {value:?}"))
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

/// Normalizes a raw postal code string. See [`PostalCode::parse`].
pub fn normalize(raw: &str) -> Option<PostalCode> {
    PostalCode::parse(raw)
}

/// Extracts the postal code from a textual service-area entry.
///
/// Patterns are tried from most to least specific: slug suffix, then
/// parenthesized group, then bare digits, then any 4–5 digit run. A slug like
/// `"calle-5-de-mayo-1234-roma-06700"` contains an earlier digit run that a
/// plain scan would pick up, so the suffix must win.
pub fn extract_from_text(entry: &str) -> Option<PostalCode> {
    let entry = entry.trim();

    [&SLUG_SUFFIX, &PARENTHESIZED, &BARE_DIGITS]
        .iter()
        .find_map(|pattern| pattern.captures(entry))
        .and_then(|caps| caps.get(1))
        .and_then(|m| PostalCode::from_digits(m.as_str()))
        .or_else(|| first_digit_run(entry).and_then(PostalCode::from_digits))
}

/// First maximal run of ASCII digits that is four or five characters long.
fn first_digit_run(s: &str) -> Option<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .find(|run| (4..=5).contains(&run.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(s: &str) -> Option<String> {
        normalize(s).map(String::from)
    }

    #[test]
    fn test_normalize_pads_four_digits() {
        assert_eq!(code("3310").as_deref(), Some("03310"));
        assert_eq!(code("03310").as_deref(), Some("03310"));
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(code("  06700 ").as_deref(), Some("06700"));
        assert_eq!(code("067 00").as_deref(), Some("06700"));
        assert_eq!(code("\t3310\n").as_deref(), Some("03310"));
    }

    #[test]
    fn test_normalize_invalid_inputs() {
        assert!(normalize("abc").is_none());
        assert!(normalize("").is_none());
        assert!(normalize("   ").is_none());
        assert!(normalize("123").is_none());
        assert!(normalize("123456").is_none());
    }

    #[test]
    fn test_normalize_extracts_first_run() {
        assert_eq!(code("CP 06700, CDMX").as_deref(), Some("06700"));
        assert_eq!(code("C.P.3310").as_deref(), Some("03310"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["3310", "03310", " 06 700", "CP 1234", "99999"] {
            let once = normalize(raw).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_from_number() {
        assert_eq!(PostalCode::from_number(3310.0).unwrap().as_str(), "03310");
        assert_eq!(PostalCode::from_number(6700.0).unwrap().as_str(), "06700");
        assert_eq!(PostalCode::from_number(99999.0).unwrap().as_str(), "99999");
        assert!(PostalCode::from_number(123.0).is_none());
        assert!(PostalCode::from_number(-3310.0).is_none());
        assert!(PostalCode::from_number(3310.5).is_none());
        assert!(PostalCode::from_number(123_456.0).is_none());
        assert!(PostalCode::from_number(f64::NAN).is_none());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(PostalCode::from_json(&json!(3310)).unwrap().as_str(), "03310");
        assert_eq!(PostalCode::from_json(&json!("3310")).unwrap().as_str(), "03310");
        assert!(PostalCode::from_json(&json!(null)).is_none());
        assert!(PostalCode::from_json(&json!(true)).is_none());
    }

    #[test]
    fn test_extract_slug_suffix() {
        assert_eq!(
            extract_from_text("santa-cruz-atoyac-03310").unwrap().as_str(),
            "03310"
        );
    }

    #[test]
    fn test_extract_slug_suffix_beats_earlier_run() {
        assert_eq!(
            extract_from_text("calle-5-de-mayo-1234-roma-06700").unwrap().as_str(),
            "06700"
        );
    }

    #[test]
    fn test_extract_parenthesized() {
        assert_eq!(extract_from_text("(03310)").unwrap().as_str(), "03310");
        assert_eq!(
            extract_from_text("Lote 1200 Roma Norte (6700)").unwrap().as_str(),
            "06700"
        );
    }

    #[test]
    fn test_extract_bare_and_generic() {
        assert_eq!(extract_from_text("3310").unwrap().as_str(), "03310");
        assert_eq!(extract_from_text(" 06700 ").unwrap().as_str(), "06700");
        assert_eq!(extract_from_text("zona 06700 centro").unwrap().as_str(), "06700");
        assert!(extract_from_text("roma-norte").is_none());
        assert!(extract_from_text("").is_none());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let code = normalize("3310").unwrap();
        assert_eq!(serde_json::to_value(&code).unwrap(), json!("03310"));

        let back: PostalCode = serde_json::from_value(json!("03310")).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_value::<PostalCode>(json!("nope")).is_err());
    }
}
