//! DTOs for the geocoding endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::{require_number, validation_error};
use crate::domain::geo::{Coordinate, InvalidCoordinate};
use crate::error::AppError;
use crate::infrastructure::geocoding::GeocodedPlace;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GeocodeParams {
    #[validate(length(min = 2, max = 200, message = "Query must be 2 to 200 characters"))]
    pub q: Option<String>,
}

impl GeocodeParams {
    /// Returns the trimmed search text.
    pub fn into_text(self) -> Result<String, AppError> {
        let text = self.q.map(|q| q.trim().to_string()).unwrap_or_default();
        let params = GeocodeParams { q: Some(text) };
        params.validate().map_err(validation_error)?;
        Ok(params.q.unwrap_or_default())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReverseGeocodeParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl ReverseGeocodeParams {
    pub fn into_coordinate(self) -> Result<Coordinate, AppError> {
        let lat = require_number("lat", self.lat.as_deref())?;
        let lng = require_number("lng", self.lng.as_deref())?;
        Coordinate::try_new(lat, lng).map_err(|e| {
            let field = match e {
                InvalidCoordinate::Latitude(_) => "lat",
                InvalidCoordinate::Longitude(_) => "lng",
            };
            AppError::bad_request(e.to_string(), json!({ "field": field }))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<GeocodedPlace>,
}

impl From<Option<GeocodedPlace>> for GeocodeResponse {
    fn from(place: Option<GeocodedPlace>) -> Self {
        Self {
            found: place.is_some(),
            place,
        }
    }
}
