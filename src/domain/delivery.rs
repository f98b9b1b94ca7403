//! Single-vendor delivery check used on product pages.

use serde::Serialize;

use super::entities::{FulfillmentMode, VendorCandidate};
use super::geo::{Coordinate, distance_km};
use super::postal_code::PostalCode;

/// Vendor radius used when a vendor has not configured its own.
pub const DEFAULT_SERVICE_RADIUS_KM: f64 = 10.0;

/// Where the customer wants the order delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPoint {
    pub coordinate: Coordinate,
    /// Raw postal code, if the customer gave one.
    pub postal_code: Option<String>,
}

impl DeliveryPoint {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            postal_code: None,
        }
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    fn supplied_postal_code(&self) -> Option<&str> {
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Machine-readable outcome of a delivery check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryReason {
    InServiceArea,
    WithinRadius,
    OutsideServiceArea,
    OutsideRadius,
    PostalCodeRequired,
    VendorLocationUnknown,
    DeliveryNotOffered,
}

/// Result of [`check_delivery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryCheck {
    pub within_radius: bool,
    pub distance_km: Option<f64>,
    pub reason: DeliveryReason,
    /// Explanation suitable for showing to the customer.
    pub message: String,
}

impl DeliveryCheck {
    fn new(within: bool, distance_km: Option<f64>, reason: DeliveryReason, message: String) -> Self {
        Self {
            within_radius: within,
            distance_km,
            reason,
            message,
        }
    }
}

/// Decides whether `vendor` delivers to `point`.
///
/// Vendors with a usable declared service area are judged by postal code
/// only; the others by straight-line distance against their own
/// `service_radius_km` (or `default_radius_km`). This radius is per vendor
/// and unrelated to the search radius of the nearby lookup.
///
/// Only a vendor that explicitly disabled delivery is turned away up front;
/// unconfigured fulfillment flags fall through to the geographic check.
pub fn check_delivery(
    vendor: &VendorCandidate,
    point: &DeliveryPoint,
    default_radius_km: f64,
) -> DeliveryCheck {
    let distance = vendor
        .coordinate
        .map(|c| distance_km(c, point.coordinate));

    if vendor.fulfillment.rules_out(FulfillmentMode::Delivery) {
        return DeliveryCheck::new(
            false,
            distance,
            DeliveryReason::DeliveryNotOffered,
            format!("{} does not offer home delivery.", vendor.name),
        );
    }

    if let Some(area) = vendor.usable_service_area() {
        let Some(raw) = point.supplied_postal_code() else {
            return DeliveryCheck::new(
                false,
                distance,
                DeliveryReason::PostalCodeRequired,
                format!(
                    "{} delivers to specific postal codes. Enter your postal code to check availability.",
                    vendor.name
                ),
            );
        };

        return match PostalCode::parse(raw) {
            Some(code) if area.contains(&code) => DeliveryCheck::new(
                true,
                distance,
                DeliveryReason::InServiceArea,
                format!("{} delivers to postal code {code}.", vendor.name),
            ),
            Some(code) => DeliveryCheck::new(
                false,
                distance,
                DeliveryReason::OutsideServiceArea,
                format!(
                    "Postal code {code} is outside the service area of {}.",
                    vendor.name
                ),
            ),
            None => DeliveryCheck::new(
                false,
                distance,
                DeliveryReason::OutsideServiceArea,
                format!(
                    "'{raw}' is not a valid postal code, so delivery by {} cannot be confirmed.",
                    vendor.name
                ),
            ),
        };
    }

    let Some(distance) = distance else {
        return DeliveryCheck::new(
            false,
            None,
            DeliveryReason::VendorLocationUnknown,
            format!(
                "{} has not configured its location or service area yet.",
                vendor.name
            ),
        );
    };

    let radius = vendor
        .service_radius_km
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(default_radius_km);

    if distance <= radius {
        DeliveryCheck::new(
            true,
            Some(distance),
            DeliveryReason::WithinRadius,
            format!(
                "{} delivers here ({distance:.1} km away, within its {radius:.1} km radius).",
                vendor.name
            ),
        )
    } else {
        DeliveryCheck::new(
            false,
            Some(distance),
            DeliveryReason::OutsideRadius,
            format!(
                "You are {distance:.1} km away, outside the {radius:.1} km delivery radius of {}.",
                vendor.name
            ),
        )
    }
}
