//! Handlers for forward and reverse geocoding.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::geocode::{GeocodeParams, GeocodeResponse, ReverseGeocodeParams};
use crate::error::AppError;
use crate::infrastructure::geocoding::Geocoder;
use crate::state::AppState;

fn geocoder(state: &AppState) -> Result<Arc<dyn Geocoder>, AppError> {
    state.geocoder.clone().ok_or_else(|| {
        AppError::unavailable(
            "Geocoding is disabled",
            json!({
                "retryable": false,
                "hint": "Provide coordinates or a postal code manually",
            }),
        )
    })
}

/// Resolves an address or place name to a coordinate.
///
/// # Endpoint
///
/// `GET /api/geocode?q=...`
///
/// # Errors
///
/// - 400 Bad Request: `q` missing or out of bounds
/// - 503 Service Unavailable: geocoder disabled or failing
pub async fn geocode_handler(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let text = params.into_text()?;
    let place = geocoder(&state)?.forward(&text).await?;
    Ok(Json(place.into()))
}

/// Resolves a coordinate to a place, including its postal code when known.
///
/// # Endpoint
///
/// `GET /api/geocode/reverse?lat&lng`
pub async fn reverse_geocode_handler(
    State(state): State<AppState>,
    Query(params): Query<ReverseGeocodeParams>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let coordinate = params.into_coordinate()?;
    let place = geocoder(&state)?.reverse(coordinate).await?;
    Ok(Json(place.into()))
}
