//! Per-vendor delivery check service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::delivery::{DeliveryCheck, DeliveryPoint, check_delivery};
use crate::domain::entities::VendorCandidate;
use crate::domain::repositories::VendorRepository;
use crate::error::AppError;

/// Answers "does this vendor deliver to me?" for a single vendor.
pub struct DeliveryService {
    vendor_repository: Arc<dyn VendorRepository>,
    default_radius_km: f64,
}

impl DeliveryService {
    /// # Arguments
    ///
    /// - `default_radius_km` - radius for vendors without `service_radius_km`
    pub fn new(vendor_repository: Arc<dyn VendorRepository>, default_radius_km: f64) -> Self {
        Self {
            vendor_repository,
            default_radius_km,
        }
    }

    /// Checks delivery from an approved vendor to `point`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the point's coordinate is out of range
    /// - [`AppError::NotFound`] if the vendor does not exist or is not approved
    /// - [`AppError::Unavailable`] if the repository cannot be reached
    pub async fn check(
        &self,
        vendor_id: i64,
        point: &DeliveryPoint,
    ) -> Result<(VendorCandidate, DeliveryCheck), AppError> {
        if !point.coordinate.is_valid() {
            return Err(AppError::bad_request(
                "Delivery location is out of range",
                json!({
                    "latitude": point.coordinate.latitude,
                    "longitude": point.coordinate.longitude,
                }),
            ));
        }

        let vendor = self
            .vendor_repository
            .find_approved(vendor_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Vendor not found", json!({ "vendorId": vendor_id }))
            })?;

        let result = check_delivery(&vendor, point, self.default_radius_km);

        let within = if result.within_radius { "true" } else { "false" };
        metrics::counter!("delivery_checks_total", "within" => within).increment(1);
        tracing::debug!(
            vendor_id,
            within = result.within_radius,
            reason = ?result.reason,
            "Delivery check"
        );

        Ok((vendor, result))
    }
}
