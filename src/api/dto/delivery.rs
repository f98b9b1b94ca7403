//! DTOs for the per-vendor delivery check.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use super::{require_number, validation_error};
use crate::domain::delivery::{DeliveryCheck, DeliveryPoint, DeliveryReason};
use crate::domain::entities::VendorCandidate;
use crate::domain::geo::Coordinate;
use crate::error::AppError;

#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryParams {
    pub lat: Option<String>,
    pub lng: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 64, message = "Postal code is too long"))]
    pub postal_code: Option<String>,
}

impl DeliveryParams {
    pub fn into_point(self) -> Result<DeliveryPoint, AppError> {
        self.validate().map_err(validation_error)?;

        let lat = require_number("lat", self.lat.as_deref())?;
        let lng = require_number("lng", self.lng.as_deref())?;

        let point = DeliveryPoint::new(Coordinate::new(lat, lng));
        Ok(match self.postal_code {
            Some(code) => point.with_postal_code(code),
            None => point,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub vendor_id: i64,
    pub vendor_name: String,
    pub within_radius: bool,
    pub distance_km: Option<f64>,
    pub reason: DeliveryReason,
    pub message: String,
}

impl DeliveryResponse {
    pub fn new(vendor: &VendorCandidate, check: DeliveryCheck) -> Self {
        Self {
            vendor_id: vendor.id,
            vendor_name: vendor.name.clone(),
            within_radius: check.within_radius,
            distance_km: check.distance_km.map(|d| (d * 100.0).round() / 100.0),
            reason: check.reason,
            message: check.message,
        }
    }
}
