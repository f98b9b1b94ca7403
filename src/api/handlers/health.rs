//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy or disabled
/// - **503 Service Unavailable**: One or more components failing
///
/// # Components Checked
///
/// 1. **Database**: Counts approved vendors
/// 2. **Cache**: Redis PING (reported as disabled without Redis)
/// 3. **Geocoder**: Whether it is configured; no request is made
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "42 approved vendors" },
///     "cache": { "status": "ok", "message": "Redis connected" },
///     "geocoder": { "status": "disabled", "message": "GEOCODER_URL not set" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;
    let geocoder_check = check_geocoder(&state);

    let all_healthy =
        db_check.is_healthy() && cache_check.is_healthy() && geocoder_check.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
            geocoder: geocoder_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.vendor_repository.count_approved().await {
        Ok(count) => CheckStatus::ok(format!("{count} approved vendors")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

/// Checks cache connectivity via PING command.
async fn check_cache(state: &AppState) -> CheckStatus {
    if !state.cache.is_enabled() {
        return CheckStatus::disabled("Caching disabled");
    }

    if state.cache.health_check().await {
        CheckStatus::ok("Redis connected")
    } else {
        CheckStatus::error("Redis connection failed")
    }
}

fn check_geocoder(state: &AppState) -> CheckStatus {
    match state.geocoder {
        Some(_) => CheckStatus::ok("Configured"),
        None => CheckStatus::disabled("GEOCODER_URL not set"),
    }
}
