//! Application error type and its HTTP mapping.
//!
//! Every variant carries a human-readable message plus structured `details`
//! rendered as:
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::geo::InvalidCoordinate;
use crate::domain::resolver::InvalidQuery;
use crate::infrastructure::geocoding::GeocodeError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload shared by all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller sent bad input. Never retried, never coerced.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// An upstream collaborator (database, geocoder) failed or timed out.
    /// Distinct from an empty result; the caller may retry.
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "service_unavailable",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn info(self) -> ErrorInfo {
        let code = self.code();
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::NotFound { message, details }
            | Self::Unavailable { message, details }
            | Self::Internal { message, details } => (message, details),
        };
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }

        (status, Json(ErrorBody { error: self.info() })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => {
                tracing::warn!("Vendor source unavailable: {}", e);
                AppError::unavailable(
                    "Vendor data source is unavailable",
                    json!({ "retryable": true }),
                )
            }
            _ => {
                tracing::error!("Database error: {}", e);
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<InvalidQuery> for AppError {
    fn from(e: InvalidQuery) -> Self {
        let field = match &e {
            InvalidQuery::Coordinate(InvalidCoordinate::Latitude(_)) => "lat",
            InvalidQuery::Coordinate(InvalidCoordinate::Longitude(_)) => "lng",
            InvalidQuery::MaxDistance(_) => "maxDistance",
        };
        AppError::bad_request(e.to_string(), json!({ "field": field }))
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        tracing::warn!("Geocoding failed: {}", e);
        AppError::unavailable(
            "Geocoding service is unavailable",
            json!({
                "retryable": e.is_transient(),
                "hint": "Provide coordinates or a postal code manually",
            }),
        )
    }
}
