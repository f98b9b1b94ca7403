//! Data Transfer Objects for API requests and responses.
//!
//! Query DTOs keep numeric parameters as raw strings so malformed input is
//! reported through [`crate::error::AppError`] with the offending field,
//! instead of the extractor's plain-text rejection.

pub mod delivery;
pub mod geocode;
pub mod health;
pub mod nearby;

use serde_json::json;

use crate::error::AppError;

/// Parses an optional numeric query parameter.
///
/// Returns `Ok(None)` for an absent or blank value.
pub(crate) fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(AppError::bad_request(
            format!("'{field}' must be a number"),
            json!({ "field": field, "value": raw }),
        )),
    }
}

/// Parses a required numeric query parameter.
pub(crate) fn require_number(field: &'static str, raw: Option<&str>) -> Result<f64, AppError> {
    parse_number(field, raw)?.ok_or_else(|| {
        AppError::bad_request(
            format!("'{field}' is required"),
            json!({ "field": field }),
        )
    })
}

/// Parses an optional boolean flag (`true`/`false`/`1`/`0`).
pub(crate) fn parse_flag(field: &'static str, raw: Option<&str>) -> Result<bool, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(AppError::bad_request(
            format!("'{field}' must be true or false"),
            json!({ "field": field, "value": v }),
        )),
    }
}

/// Maps `validator` failures to a 400 listing the invalid fields.
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    AppError::bad_request(
        "Invalid query parameters",
        json!({ "fields": fields, "reason": errors.to_string() }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("lat", None).unwrap(), None);
        assert_eq!(parse_number("lat", Some("  ")).unwrap(), None);
        assert_eq!(parse_number("lat", Some("19.43")).unwrap(), Some(19.43));
        assert!(parse_number("lat", Some("north")).is_err());
        assert!(parse_number("lat", Some("NaN")).is_err());
        assert!(parse_number("lat", Some("inf")).is_err());
    }

    #[test]
    fn test_require_number_names_field() {
        let info = require_number("lng", None).unwrap_err().info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["field"], "lng");
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag("openNow", None).unwrap());
        assert!(parse_flag("openNow", Some("true")).unwrap());
        assert!(parse_flag("openNow", Some("1")).unwrap());
        assert!(!parse_flag("openNow", Some("FALSE")).unwrap());
        assert!(parse_flag("openNow", Some("maybe")).is_err());
    }
}
