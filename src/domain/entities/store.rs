//! Output of store resolution.

use serde::Serialize;

use super::vendor::{FulfillmentModes, VendorCandidate};

/// Why a vendor was considered able to serve the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// The customer's postal code is in the vendor's declared service area.
    ServiceArea,
    /// The vendor declares no usable area and lies within the search radius.
    Distance,
}

/// A vendor that can serve the customer, shaped for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStore {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub fulfillment: FulfillmentModes,
    pub minimum_order: f64,
    /// `None` when the vendor has no coordinate.
    pub distance_km: Option<f64>,
    /// Present only when the distance is known.
    pub delivery_time_minutes: Option<u32>,
    pub eligibility: Eligibility,
}

impl ResolvedStore {
    pub fn from_candidate(
        vendor: &VendorCandidate,
        distance_km: Option<f64>,
        eligibility: Eligibility,
    ) -> Self {
        Self {
            id: vendor.id,
            name: vendor.name.clone(),
            slug: vendor.slug.clone(),
            logo_url: vendor.logo_url.clone(),
            description: vendor.description.clone(),
            phone: vendor.phone.clone(),
            email: vendor.email.clone(),
            address: vendor.address.clone(),
            fulfillment: vendor.fulfillment,
            minimum_order: vendor.minimum_order,
            distance_km,
            delivery_time_minutes: None,
            eligibility,
        }
    }
}
