//! Nominatim HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use url::Url;

use super::{GeocodeError, GeocodedPlace, Geocoder};
use crate::domain::geo::Coordinate;
use crate::domain::postal_code::PostalCode;

const USER_AGENT: &str = concat!("store-locator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    postcode: Option<String>,
}

impl NominatimPlace {
    fn into_place(self) -> Result<GeocodedPlace, GeocodeError> {
        let latitude: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeError::Decode(format!("bad latitude '{}'", self.lat)))?;
        let longitude: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeError::Decode(format!("bad longitude '{}'", self.lon)))?;
        let coordinate = Coordinate::try_new(latitude, longitude)
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        // Providers return "03310", "03310-000" or "CP 03310"; keep only codes we can match on.
        let postal_code = self
            .address
            .and_then(|a| a.postcode)
            .and_then(|raw| PostalCode::parse(&raw));

        Ok(GeocodedPlace {
            coordinate,
            display_name: self.display_name,
            postal_code,
        })
    }
}

/// Geocoder backed by a Nominatim-compatible API.
///
/// Every request is bounded by the client timeout. Transient failures
/// (network errors, 429, 5xx) are retried with jittered exponential backoff
/// up to `max_retries` additional attempts.
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
    max_retries: usize,
    backoff_base_ms: u64,
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidUrl`] if `base_url` does not parse and
    /// [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, max_retries: usize) -> Result<Self, GeocodeError> {
        // Url::join drops the last path segment unless it ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms: 100,
        })
    }

    /// Overrides the first backoff delay. Tests use a tiny value.
    pub fn with_backoff_base_ms(mut self, backoff_base_ms: u64) -> Self {
        self.backoff_base_ms = backoff_base_ms.max(1);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, GeocodeError> {
        self.base_url
            .join(path)
            .map_err(|e| GeocodeError::InvalidUrl(e.to_string()))
    }

    /// Sends one GET with retries and returns the decoded JSON body.
    async fn get_json(&self, url: Url) -> Result<Value, GeocodeError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.backoff_base_ms / 2)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.max_retries);

        RetryIf::start(
            strategy,
            || self.fetch_once(url.clone()),
            |e: &GeocodeError| {
                let retry = e.is_transient();
                if retry {
                    tracing::debug!("Retrying geocoder request: {}", e);
                }
                retry
            },
        )
        .await
    }

    async fn fetch_once(&self, url: Url) -> Result<Value, GeocodeError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Geocoder returned an error status");
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn forward(&self, text: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("format", "jsonv2")
            .append_pair("addressdetails", "1")
            .append_pair("limit", "1");

        let body = self.get_json(url).await?;
        let places: Vec<NominatimPlace> =
            serde_json::from_value(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

        places.into_iter().next().map(NominatimPlace::into_place).transpose()
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<GeocodedPlace>, GeocodeError> {
        let mut url = self.endpoint("reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &coordinate.latitude.to_string())
            .append_pair("lon", &coordinate.longitude.to_string())
            .append_pair("format", "jsonv2")
            .append_pair("addressdetails", "1");

        let body = self.get_json(url).await?;

        // Nothing nearby is reported as 200 {"error": "Unable to geocode"}.
        if body.get("error").is_some() {
            return Ok(None);
        }

        let place: NominatimPlace =
            serde_json::from_value(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;
        place.into_place().map(Some)
    }
}
