//! Handler for the nearby-stores endpoint.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::nearby::{NearbyParams, NearbyResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the stores that can serve a customer, nearest first.
///
/// # Endpoint
///
/// `GET /api/stores/nearby`
///
/// # Query Parameters
///
/// - `lat`, `lng` (required): Customer location
/// - `maxDistance` (optional): Search radius in km (default: `DEFAULT_MAX_DISTANCE_KM`)
/// - `postalCode` (optional): Customer postal code, enables service-area matching
/// - `fulfillment` (optional): `pickup`, `delivery` or `meetupPoint`
/// - `openNow` (optional): Only stores open at the current business time
///
/// # Response
///
/// ```json
/// {
///   "stores": [
///     {
///       "id": 7,
///       "name": "Panadería Rosa",
///       "distanceKm": 1.24,
///       "deliveryTimeMinutes": 32,
///       "eligibility": "distance"
///     }
///   ],
///   "total": 1
/// }
/// ```
///
/// An empty result is still `200 OK` and carries a `message`; when
/// `EXPOSE_DIAGNOSTICS` is on it also carries `diagnostics`.
///
/// # Errors
///
/// - 400 Bad Request: missing or malformed parameters
/// - 503 Service Unavailable: vendor data could not be loaded
pub async fn nearby_handler(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResponse>, AppError> {
    let query = params.into_query(
        state.search.default_max_distance_km,
        state.search.local_now(),
    )?;

    let resolution = state.store_service.find_nearby(&query).await?;

    if let Some(reason) = resolution.report.empty_reason() {
        tracing::info!(
            reason = reason.as_str(),
            candidates = resolution.report.candidates,
            postal_code = query.supplied_postal_code(),
            "Nearby search returned no stores"
        );
    }

    Ok(Json(NearbyResponse::from_resolution(
        resolution,
        &query,
        state.search.expose_diagnostics,
    )))
}
