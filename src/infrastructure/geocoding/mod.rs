//! Forward and reverse geocoding.
//!
//! The [`Geocoder`] trait is what the HTTP layer depends on; the production
//! implementation talks to a Nominatim-compatible API.

mod nominatim;

pub use nominatim::NominatimGeocoder;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;

/// A place resolved by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub display_name: String,
    /// Normalized postal code, when the provider returned a usable one.
    pub postal_code: Option<PostalCode>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("geocoder response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid geocoder URL: {0}")]
    InvalidUrl(String),
}

impl GeocodeError {
    /// Network failures, throttling and server errors are worth another try.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::UnexpectedStatus { status } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves free text (an address, a neighbourhood, a postal code) to its
    /// best match. `Ok(None)` means the provider found nothing.
    async fn forward(&self, text: &str) -> Result<Option<GeocodedPlace>, GeocodeError>;

    /// Resolves a coordinate to the nearest known place.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<GeocodedPlace>, GeocodeError>;
}
