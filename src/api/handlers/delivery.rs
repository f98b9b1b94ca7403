//! Handler for the per-vendor delivery check.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::delivery::{DeliveryParams, DeliveryResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Checks whether a vendor delivers to the given location.
///
/// # Endpoint
///
/// `GET /api/vendors/{id}/delivery?lat&lng&postalCode`
///
/// # Response
///
/// ```json
/// {
///   "vendorId": 7,
///   "vendorName": "Panadería Rosa",
///   "withinRadius": false,
///   "distanceKm": 14.2,
///   "reason": "outside_radius",
///   "message": "You are 14.2 km away, outside the 10.0 km delivery radius of Panadería Rosa."
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request: missing or malformed coordinates
/// - 404 Not Found: unknown or unapproved vendor
pub async fn delivery_handler(
    State(state): State<AppState>,
    Path(vendor_id): Path<i64>,
    Query(params): Query<DeliveryParams>,
) -> Result<Json<DeliveryResponse>, AppError> {
    let point = params.into_point()?;

    let (vendor, check) = state.delivery_service.check(vendor_id, &point).await?;

    Ok(Json(DeliveryResponse::new(&vendor, check)))
}
