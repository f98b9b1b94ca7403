//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`                      - Health check: DB, cache, geocoder
//! - `GET /api/stores/nearby`           - Nearby store lookup
//! - `GET /api/vendors/{id}/delivery`   - Per-vendor delivery check
//! - `GET /api/geocode[/reverse]`       - Geocoding proxy
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for geocoding
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes without middleware. Handler tests drive this directly; rate
/// limiting needs the peer address, which in-memory test transports lack.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .nest(
            "/api",
            api::routes::store_routes().merge(api::routes::geocode_routes()),
        )
}

/// Constructs the application router with all routes and middleware.
///
/// Must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` for the rate limiter
/// to see client addresses.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let store_api = api::routes::store_routes().layer(rate_limit::layer());
    let geocode_api = api::routes::geocode_routes().layer(rate_limit::geocode_layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", store_api.merge(geocode_api))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
