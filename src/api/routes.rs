//! API route configuration.

use crate::api::handlers::{
    delivery_handler, geocode_handler, nearby_handler, reverse_geocode_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Store discovery routes.
///
/// # Endpoints
///
/// - `GET /stores/nearby`          - Stores able to serve a location/postal code
/// - `GET /vendors/{id}/delivery`  - Whether one vendor delivers to a location
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/stores/nearby", get(nearby_handler))
        .route("/vendors/{id}/delivery", get(delivery_handler))
}

/// Geocoding routes.
///
/// # Endpoints
///
/// - `GET /geocode`          - Address or place name to coordinate
/// - `GET /geocode/reverse`  - Coordinate to place and postal code
pub fn geocode_routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(geocode_handler))
        .route("/geocode/reverse", get(reverse_geocode_handler))
}
