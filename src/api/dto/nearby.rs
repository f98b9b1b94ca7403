//! DTOs for the nearby-stores endpoint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use super::{parse_flag, parse_number, require_number, validation_error};
use crate::domain::entities::{
    Eligibility, FulfillmentMode, FulfillmentModes, ResolvedStore, UnknownFulfillmentMode,
};
use crate::domain::geo::Coordinate;
use crate::domain::resolver::{EmptyReason, NearbyQuery, Resolution, ResolutionReport};
use crate::error::AppError;

/// Query string of `GET /api/stores/nearby`.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub max_distance: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 64, message = "Postal code is too long"))]
    pub postal_code: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub fulfillment: Option<String>,

    pub open_now: Option<String>,
}

impl NearbyParams {
    /// Builds the domain query. Range checks happen in the service.
    ///
    /// `now` is the current wall-clock time in the vendors' time zone and is
    /// only used when `openNow` is set.
    pub fn into_query(
        self,
        default_max_distance_km: f64,
        now: NaiveDateTime,
    ) -> Result<NearbyQuery, AppError> {
        self.validate().map_err(validation_error)?;

        let lat = require_number("lat", self.lat.as_deref())?;
        let lng = require_number("lng", self.lng.as_deref())?;
        let max_distance = parse_number("maxDistance", self.max_distance.as_deref())?
            .unwrap_or(default_max_distance_km);

        let mut query = NearbyQuery::new(Coordinate::new(lat, lng), max_distance);

        if let Some(code) = self.postal_code {
            query = query.with_postal_code(code);
        }

        if let Some(raw) = self.fulfillment.as_deref() {
            let mode: FulfillmentMode = raw.parse().map_err(|e: UnknownFulfillmentMode| {
                AppError::bad_request(e.to_string(), json!({ "field": "fulfillment", "value": raw }))
            })?;
            query = query.with_fulfillment(mode);
        }

        if parse_flag("openNow", self.open_now.as_deref())? {
            query = query.open_at(now);
        }

        Ok(query)
    }
}

/// A store in the nearby response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreItem {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub fulfillment_modes: FulfillmentModes,
    pub minimum_order: f64,
    /// Rounded to two decimals; `null` for area-matched stores without a location.
    pub distance_km: Option<f64>,
    pub delivery_time_minutes: Option<u32>,
    pub eligibility: Eligibility,
}

impl From<ResolvedStore> for StoreItem {
    fn from(store: ResolvedStore) -> Self {
        Self {
            id: store.id,
            name: store.name,
            slug: store.slug,
            logo_url: store.logo_url,
            description: store.description,
            phone: store.phone,
            email: store.email,
            address: store.address,
            fulfillment_modes: store.fulfillment,
            minimum_order: store.minimum_order,
            distance_km: store.distance_km.map(|d| (d * 100.0).round() / 100.0),
            delivery_time_minutes: store.delivery_time_minutes,
            eligibility: store.eligibility,
        }
    }
}

/// Why the result is empty, plus the counters behind it.
#[derive(Debug, Serialize)]
pub struct Diagnostics {
    pub reason: EmptyReason,
    pub report: ResolutionReport,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stores: Vec<StoreItem>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl NearbyResponse {
    pub fn from_resolution(
        resolution: Resolution,
        query: &NearbyQuery,
        expose_diagnostics: bool,
    ) -> Self {
        let reason = resolution.report.empty_reason();
        let message = reason.map(|r| empty_message(r, query, &resolution.report));
        let diagnostics = match reason {
            Some(reason) if expose_diagnostics => Some(Diagnostics {
                reason,
                report: resolution.report,
            }),
            _ => None,
        };

        let stores: Vec<StoreItem> = resolution.stores.into_iter().map(StoreItem::from).collect();

        Self {
            total: stores.len(),
            stores,
            message,
            diagnostics,
        }
    }
}

/// Customer-facing explanation for an empty result.
fn empty_message(reason: EmptyReason, query: &NearbyQuery, report: &ResolutionReport) -> String {
    let hint = match reason {
        EmptyReason::NoCandidates => "No stores are available yet.".to_string(),
        EmptyReason::NoPostalCodeMatch if report.postal_code_valid == Some(false) => format!(
            "'{}' is not a valid postal code. Check it or search by location only.",
            query.supplied_postal_code().unwrap_or_default()
        ),
        EmptyReason::NoPostalCodeMatch => format!(
            "No stores deliver to postal code {}. Try a nearby postal code.",
            query.supplied_postal_code().unwrap_or_default()
        ),
        EmptyReason::NoVendorsInRange => format!(
            "No stores within {} km. Try increasing the search distance.",
            query.max_distance_km
        ),
        EmptyReason::FilteredByFulfillment => match query.fulfillment {
            Some(mode) => format!("No nearby stores offer {mode}. Try another fulfillment option."),
            None => "No nearby stores match the selected fulfillment option.".to_string(),
        },
        EmptyReason::FilteredByHours => {
            "No nearby stores are open right now. Try again later.".to_string()
        }
    };

    format!("No stores found. {hint}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn params(lat: &str, lng: &str) -> NearbyParams {
        NearbyParams {
            lat: Some(lat.to_string()),
            lng: Some(lng.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_into_query_defaults() {
        let query = params("19.43", "-99.13").into_query(50.0, now()).unwrap();
        assert_eq!(query.origin, Coordinate::new(19.43, -99.13));
        assert_eq!(query.max_distance_km, 50.0);
        assert!(query.postal_code.is_none());
        assert!(query.fulfillment.is_none());
        assert!(query.open_at.is_none());
    }

    #[test]
    fn test_into_query_all_parameters() {
        let p = NearbyParams {
            max_distance: Some("12.5".into()),
            postal_code: Some("03310".into()),
            fulfillment: Some("meetupPoint".into()),
            open_now: Some("true".into()),
            ..params("19.43", "-99.13")
        };

        let query = p.into_query(50.0, now()).unwrap();
        assert_eq!(query.max_distance_km, 12.5);
        assert_eq!(query.supplied_postal_code(), Some("03310"));
        assert_eq!(query.fulfillment, Some(FulfillmentMode::MeetupPoint));
        assert_eq!(query.open_at, Some(now()));
    }

    #[test]
    fn test_into_query_rejects_bad_input() {
        let missing = NearbyParams {
            lat: Some("19.4".into()),
            ..Default::default()
        };
        assert_eq!(
            missing.into_query(50.0, now()).unwrap_err().info().details["field"],
            "lng"
        );

        let bad_mode = NearbyParams {
            fulfillment: Some("drone".into()),
            ..params("19.43", "-99.13")
        };
        assert_eq!(
            bad_mode.into_query(50.0, now()).unwrap_err().info().details["field"],
            "fulfillment"
        );

        let long_code = NearbyParams {
            postal_code: Some("1".repeat(65)),
            ..params("19.43", "-99.13")
        };
        let info = long_code.into_query(50.0, now()).unwrap_err().info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["fields"], json!(["postal_code"]));
    }

    #[test]
    fn test_into_query_accepts_free_text_postal_code() {
        let p = NearbyParams {
            postal_code: Some("C.P. 06700, Ciudad de México".into()),
            ..params("19.43", "-99.13")
        };

        let query = p.into_query(50.0, now()).unwrap();
        assert_eq!(query.supplied_postal_code(), Some("C.P. 06700, Ciudad de México"));
    }

    #[test]
    fn test_empty_message_mentions_radius() {
        let query = NearbyQuery::new(Coordinate::new(19.43, -99.13), 5.0);
        let report = ResolutionReport {
            candidates: 2,
            rejected_by_distance: 2,
            ..Default::default()
        };
        let message = empty_message(EmptyReason::NoVendorsInRange, &query, &report);
        assert!(message.starts_with("No stores found."));
        assert!(message.contains("5 km"));
    }

    #[test]
    fn test_diagnostics_only_when_exposed() {
        let query = NearbyQuery::new(Coordinate::new(19.43, -99.13), 5.0);
        let empty = || Resolution {
            stores: vec![],
            report: ResolutionReport::default(),
        };

        let hidden = NearbyResponse::from_resolution(empty(), &query, false);
        assert!(hidden.diagnostics.is_none());
        assert!(hidden.message.is_some());

        let shown = NearbyResponse::from_resolution(empty(), &query, true);
        assert_eq!(shown.diagnostics.unwrap().reason, EmptyReason::NoCandidates);
    }
}
