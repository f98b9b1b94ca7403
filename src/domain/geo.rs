//! Great-circle distance and delivery-time estimation.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Base preparation time for any delivery.
const BASE_DELIVERY_MINUTES: f64 = 30.0;
/// Travel time added per kilometre.
const MINUTES_PER_KM: f64 = 2.0;
/// Estimates never exceed two hours.
const MAX_DELIVERY_MINUTES: f64 = 120.0;

/// Errors produced when building a coordinate from caller input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    #[error("latitude must be a finite number between -90 and 90, got {0}")]
    Latitude(f64),

    #[error("longitude must be a finite number between -180 and 180, got {0}")]
    Longitude(f64),
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] naming the offending component.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Builds a coordinate from optional stored columns.
    ///
    /// Vendor records keep latitude and longitude in separate nullable
    /// columns; a pair with a missing or invalid half is unusable.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::try_new(latitude?, longitude?).ok()
    }

    pub fn is_valid(&self) -> bool {
        Self::try_new(self.latitude, self.longitude).is_ok()
    }
}

/// Haversine distance in kilometres between two coordinates.
///
/// Symmetric, zero for identical points and never negative.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimated delivery time: 30 minutes plus 2 per kilometre, capped at 120.
pub fn estimate_delivery_minutes(distance_km: f64) -> u32 {
    let minutes = BASE_DELIVERY_MINUTES + MINUTES_PER_KM * distance_km.max(0.0);
    minutes.round().min(MAX_DELIVERY_MINUTES) as u32
}
