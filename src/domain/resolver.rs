//! Store resolution: which vendors can serve a customer, and in what order.
//!
//! [`resolve`] is a pure function over an already-loaded candidate set.
//! Loading, caching and timeouts live in
//! [`crate::application::services::StoreService`].
//!
//! # Eligibility
//!
//! A vendor is eligible when either
//!
//! - it declares a usable service area and the customer's postal code is in
//!   it, or
//! - it declares no usable service area and its coordinate lies within
//!   `max_distance_km` of the customer.
//!
//! A declared area takes precedence: a vendor whose area does not contain the
//! customer's code is excluded even when it is close by. When the customer
//! supplies no postal code, area matching is impossible and every vendor is
//! judged by distance.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

use super::entities::{Eligibility, FulfillmentMode, ResolvedStore, VendorCandidate};
use super::geo::{Coordinate, InvalidCoordinate, distance_km, estimate_delivery_minutes};
use super::postal_code::PostalCode;

/// Default cross-vendor search radius.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Rejected search parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidQuery {
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    #[error("maxDistance must be a positive number of kilometres, got {0}")]
    MaxDistance(f64),
}

/// A nearby-stores request.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: Coordinate,
    pub max_distance_km: f64,
    /// Raw postal code as typed by the customer.
    pub postal_code: Option<String>,
    pub fulfillment: Option<FulfillmentMode>,
    /// Local business time to check opening hours against; `None` disables
    /// the open-now filter.
    pub open_at: Option<NaiveDateTime>,
}

impl NearbyQuery {
    pub fn new(origin: Coordinate, max_distance_km: f64) -> Self {
        Self {
            origin,
            max_distance_km,
            postal_code: None,
            fulfillment: None,
            open_at: None,
        }
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn with_fulfillment(mut self, mode: FulfillmentMode) -> Self {
        self.fulfillment = Some(mode);
        self
    }

    pub fn open_at(mut self, at: NaiveDateTime) -> Self {
        self.open_at = Some(at);
        self
    }

    /// Checks the parameters before any vendor data is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidQuery`] for an out-of-range origin or a radius that is
    /// not a positive finite number.
    pub fn validate(&self) -> Result<(), InvalidQuery> {
        Coordinate::try_new(self.origin.latitude, self.origin.longitude)?;
        if !self.max_distance_km.is_finite() || self.max_distance_km <= 0.0 {
            return Err(InvalidQuery::MaxDistance(self.max_distance_km));
        }
        Ok(())
    }

    /// The supplied postal code, ignoring blank input.
    pub fn supplied_postal_code(&self) -> Option<&str> {
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Whether only vendors with a coordinate can possibly be eligible.
    pub fn requires_vendor_coordinates(&self) -> bool {
        self.supplied_postal_code().is_none()
    }
}

/// Why a resolution came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoCandidates,
    NoPostalCodeMatch,
    NoVendorsInRange,
    FilteredByFulfillment,
    FilteredByHours,
}

impl EmptyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCandidates => "no_candidates",
            Self::NoPostalCodeMatch => "no_postal_code_match",
            Self::NoVendorsInRange => "no_vendors_in_range",
            Self::FilteredByFulfillment => "filtered_by_fulfillment",
            Self::FilteredByHours => "filtered_by_hours",
        }
    }
}

/// Counters describing how a resolution reached its result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub candidates: usize,
    pub area_matches: usize,
    pub distance_matches: usize,
    pub rejected_by_area: usize,
    pub rejected_by_distance: usize,
    pub missing_location: usize,
    pub removed_by_fulfillment: usize,
    pub removed_by_hours: usize,
    pub returned: usize,
    /// `None` when no postal code was supplied.
    pub postal_code_valid: Option<bool>,
}

impl ResolutionReport {
    pub fn eligible(&self) -> usize {
        self.area_matches + self.distance_matches
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if self.returned > 0 {
            return None;
        }
        let reason = if self.candidates == 0 {
            EmptyReason::NoCandidates
        } else if self.eligible() == 0 {
            if self.rejected_by_area > 0
                && self.rejected_by_distance == 0
                && self.missing_location == 0
            {
                EmptyReason::NoPostalCodeMatch
            } else {
                EmptyReason::NoVendorsInRange
            }
        } else if self.removed_by_fulfillment == self.eligible() {
            EmptyReason::FilteredByFulfillment
        } else {
            EmptyReason::FilteredByHours
        };
        Some(reason)
    }
}

/// Ordered stores plus the report that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub stores: Vec<ResolvedStore>,
    pub report: ResolutionReport,
}

/// Resolves which candidates can serve the query, sorted by distance.
///
/// Expects a validated query. Per-vendor data problems only affect that
/// vendor: an unusable declared area falls back to the distance rule and a
/// missing coordinate makes the distance rule fail.
pub fn resolve(candidates: &[VendorCandidate], query: &NearbyQuery) -> Resolution {
    let mut report = ResolutionReport::default();

    let postal_code = query.supplied_postal_code();
    let customer_code = postal_code.and_then(PostalCode::parse);
    report.postal_code_valid = postal_code.map(|_| customer_code.is_some());

    let mut stores = Vec::new();
    for vendor in candidates.iter().filter(|v| v.approved) {
        report.candidates += 1;

        let distance = vendor.coordinate.map(|c| distance_km(query.origin, c));

        let eligibility = match (postal_code, vendor.usable_service_area()) {
            (Some(_), Some(area)) => {
                if customer_code.as_ref().is_some_and(|code| area.contains(code)) {
                    report.area_matches += 1;
                    Some(Eligibility::ServiceArea)
                } else {
                    report.rejected_by_area += 1;
                    None
                }
            }
            // Vendors that never configured an area keep being found by
            // distance, as they were before service areas existed.
            _ => match distance {
                None => {
                    report.missing_location += 1;
                    None
                }
                Some(d) if d <= query.max_distance_km => {
                    report.distance_matches += 1;
                    Some(Eligibility::Distance)
                }
                Some(_) => {
                    report.rejected_by_distance += 1;
                    None
                }
            },
        };

        let Some(eligibility) = eligibility else {
            continue;
        };

        if let Some(mode) = query.fulfillment
            && !vendor.fulfillment.supports(mode)
        {
            report.removed_by_fulfillment += 1;
            continue;
        }

        if let Some(at) = query.open_at
            && !vendor.hours.is_open_at(at)
        {
            report.removed_by_hours += 1;
            continue;
        }

        stores.push(ResolvedStore::from_candidate(vendor, distance, eligibility));
    }

    stores.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));

    for store in &mut stores {
        store.delivery_time_minutes = store.distance_km.map(estimate_delivery_minutes);
    }

    report.returned = stores.len();
    Resolution { stores, report }
}

/// Ascending by distance; unknown distances go last and keep their order.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
