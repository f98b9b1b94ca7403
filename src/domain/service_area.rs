//! Vendor service areas and postal code matching.
//!
//! Service areas are stored as loosely-typed JSON written by several
//! generations of the vendor onboarding form. [`ServiceArea::from_json`] turns
//! any of those shapes into a list of normalized [`PostalCode`]s once, at the
//! boundary, so matching never has to inspect JSON again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::postal_code::{POSTAL_CODE_FIELDS, PostalCode, extract_from_text};

/// One declared area entry, in whichever shape the vendor data used.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaEntry {
    /// Slug, label with a parenthesized code, or bare digits.
    Text(String),
    /// A bare JSON number such as `3310`.
    Number(f64),
    /// A record exposing the code under one of [`POSTAL_CODE_FIELDS`].
    Structured(Map<String, Value>),
    /// Anything else (booleans, nested arrays, nulls).
    Unrecognized,
}

impl AreaEntry {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => n.as_f64().map_or(Self::Unrecognized, Self::Number),
            Value::Object(map) => Self::Structured(map.clone()),
            _ => Self::Unrecognized,
        }
    }

    /// Resolves the entry to a postal code, or `None` when it carries none.
    pub fn postal_code(&self) -> Option<PostalCode> {
        match self {
            Self::Text(text) => extract_from_text(text),
            Self::Number(n) => PostalCode::from_number(*n),
            Self::Structured(map) => POSTAL_CODE_FIELDS
                .iter()
                .filter_map(|field| map.get(*field))
                .find_map(|value| match value {
                    Value::String(s) => extract_from_text(s),
                    other => PostalCode::from_json(other),
                }),
            Self::Unrecognized => None,
        }
    }
}

/// Extracts the postal code from a single JSON area entry.
pub fn extract_from_area_entry(entry: &Value) -> Option<PostalCode> {
    AreaEntry::from_json(entry).postal_code()
}

/// A vendor's declared service area, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    codes: Vec<PostalCode>,
    /// Entries that were present but carried no recognizable code.
    rejected_entries: usize,
}

impl ServiceArea {
    /// Parses a declared area from its stored JSON form.
    ///
    /// Returns `None` when nothing is declared: `null`, an empty collection,
    /// an empty record or a blank string. A string holding serialized JSON is
    /// decoded first; a string that does not decode is a single entry.
    pub fn from_json(value: &Value) -> Option<Self> {
        let entries = match value {
            Value::Null => return None,
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(decoded @ (Value::Array(_) | Value::Object(_) | Value::Number(_))) => {
                    return Self::from_json(&decoded);
                }
                _ => vec![AreaEntry::Text(s.clone())],
            },
            Value::Array(items) if items.is_empty() => return None,
            Value::Array(items) => items.iter().map(AreaEntry::from_json).collect(),
            Value::Object(map) if map.is_empty() => return None,
            other => vec![AreaEntry::from_json(other)],
        };

        Some(Self::from_entries(entries))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = AreaEntry>) -> Self {
        let mut area = Self::default();
        for entry in entries {
            match entry.postal_code() {
                Some(code) if !area.codes.contains(&code) => area.codes.push(code),
                Some(_) => {}
                None => area.rejected_entries += 1,
            }
        }
        area
    }

    /// Whether at least one entry resolved to a postal code.
    ///
    /// An area where every entry is malformed is a data anomaly and callers
    /// treat the vendor as having no declared area.
    pub fn is_usable(&self) -> bool {
        !self.codes.is_empty()
    }

    pub fn contains(&self, code: &PostalCode) -> bool {
        self.codes.contains(code)
    }

    pub fn codes(&self) -> &[PostalCode] {
        &self.codes
    }

    pub fn rejected_entries(&self) -> usize {
        self.rejected_entries
    }
}

/// Decides whether a customer's postal code lies inside a declared area.
///
/// Fails closed: an unparseable customer code, a missing or empty area, or an
/// area shape that cannot be interpreted all yield `false`. Whether a vendor
/// without an area is served at all is the resolver's decision, not this
/// function's.
pub fn is_in_service_area(user_postal_code: &str, declared_area: Option<&Value>) -> bool {
    let Some(user_code) = PostalCode::parse(user_postal_code) else {
        return false;
    };

    declared_area
        .and_then(ServiceArea::from_json)
        .is_some_and(|area| area.contains(&user_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn area(value: Value) -> Option<ServiceArea> {
        ServiceArea::from_json(&value)
    }

    #[test]
    fn test_matches_slug_list() {
        let declared = json!(["santa-cruz-atoyac-03310", "roma-norte-06700"]);
        assert!(is_in_service_area("03310", Some(&declared)));
        assert!(is_in_service_area("3310", Some(&declared)));
        assert!(is_in_service_area("06700", Some(&declared)));
        assert!(!is_in_service_area("99999", Some(&declared)));
    }

    #[test]
    fn test_empty_or_missing_area_never_matches() {
        assert!(!is_in_service_area("03310", Some(&json!([]))));
        assert!(!is_in_service_area("03310", None));
        assert!(!is_in_service_area("03310", Some(&json!(null))));
        assert!(!is_in_service_area("03310", Some(&json!(""))));
        assert!(!is_in_service_area("03310", Some(&json!("   "))));
        assert!(!is_in_service_area("03310", Some(&json!({}))));
    }

    #[test]
    fn test_invalid_user_code_fails_closed() {
        let declared = json!(["03310"]);
        assert!(!is_in_service_area("abc", Some(&declared)));
        assert!(!is_in_service_area("", Some(&declared)));
    }

    #[test]
    fn test_serialized_json_string_is_decoded() {
        let declared = json!(r#"["santa-cruz-atoyac-03310", {"zip": "06700"}]"#);
        assert!(is_in_service_area("03310", Some(&declared)));
        assert!(is_in_service_area("06700", Some(&declared)));
    }

    #[test]
    fn test_undecodable_string_is_single_entry() {
        let declared = json!("Santa Cruz Atoyac (03310)");
        assert!(is_in_service_area("03310", Some(&declared)));

        let broken = json!(r#"["roma-norte-06700""#);
        assert!(is_in_service_area("06700", Some(&broken)));
    }

    #[test]
    fn test_structured_record_field_names() {
        for field in POSTAL_CODE_FIELDS {
            let mut record = Map::new();
            record.insert(field.to_string(), json!("3310"));
            let declared = Value::Object(record);
            assert!(is_in_service_area("03310", Some(&declared)), "field {field}");
        }
        assert!(is_in_service_area("03310", Some(&json!({"postalCode": 3310}))));
        assert!(!is_in_service_area("03310", Some(&json!({"name": "roma"}))));
    }

    #[test]
    fn test_bare_number_area() {
        assert!(is_in_service_area("03310", Some(&json!(3310))));
        assert!(is_in_service_area("03310", Some(&json!([3310, "roma-norte-06700"]))));
    }

    #[test]
    fn test_uninterpretable_shapes_do_not_match() {
        assert!(!is_in_service_area("03310", Some(&json!(true))));
        assert!(!is_in_service_area("03310", Some(&json!([[3310], null, false]))));
        assert!(!is_in_service_area("03310", Some(&json!({"zip": {"nested": 3310}}))));
    }

    #[test]
    fn test_extract_from_area_entry_shapes() {
        assert_eq!(
            extract_from_area_entry(&json!("santa-cruz-atoyac-03310")).unwrap().as_str(),
            "03310"
        );
        assert_eq!(extract_from_area_entry(&json!("(03310)")).unwrap().as_str(), "03310");
        assert_eq!(extract_from_area_entry(&json!(3310)).unwrap().as_str(), "03310");
        assert_eq!(
            extract_from_area_entry(&json!({"codigo_postal": "06700"})).unwrap().as_str(),
            "06700"
        );
        assert!(extract_from_area_entry(&json!(null)).is_none());
    }

    #[test]
    fn test_usability_and_rejections() {
        let mixed = area(json!(["roma-norte-06700", "garbage", 12])).unwrap();
        assert!(mixed.is_usable());
        assert_eq!(mixed.codes().len(), 1);
        assert_eq!(mixed.rejected_entries(), 2);

        let garbage = area(json!(["garbage", "more garbage"])).unwrap();
        assert!(!garbage.is_usable());

        assert!(area(json!([])).is_none());
    }

    #[test]
    fn test_duplicate_codes_are_collapsed() {
        let dup = area(json!(["3310", "03310", "atoyac-03310"])).unwrap();
        assert_eq!(dup.codes().len(), 1);
    }
}
