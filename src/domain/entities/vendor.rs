//! Vendor read model used for store resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::hours::OperatingHours;
use crate::domain::geo::Coordinate;
use crate::domain::service_area::ServiceArea;

/// How an order can be handed over to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentMode {
    #[serde(rename = "pickup")]
    Pickup,
    #[serde(rename = "delivery")]
    Delivery,
    #[serde(rename = "meetupPoint")]
    MeetupPoint,
}

impl FulfillmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
            Self::MeetupPoint => "meetupPoint",
        }
    }
}

impl fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fulfillment mode '{0}', expected one of: pickup, delivery, meetupPoint")]
pub struct UnknownFulfillmentMode(pub String);

impl FromStr for FulfillmentMode {
    type Err = UnknownFulfillmentMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            "meetupPoint" | "meetup_point" | "meetup" => Ok(Self::MeetupPoint),
            other => Err(UnknownFulfillmentMode(other.to_string())),
        }
    }
}

/// Which fulfillment modes a vendor offers.
///
/// Each flag is `None` when the vendor never configured it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentModes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<bool>,
    #[serde(
        default,
        rename = "meetupPoint",
        alias = "meetup_point",
        skip_serializing_if = "Option::is_none"
    )]
    pub meetup_point: Option<bool>,
}

impl FulfillmentModes {
    /// The configured flag for `mode`, `None` when unknown.
    pub fn offers(&self, mode: FulfillmentMode) -> Option<bool> {
        match mode {
            FulfillmentMode::Pickup => self.pickup,
            FulfillmentMode::Delivery => self.delivery,
            FulfillmentMode::MeetupPoint => self.meetup_point,
        }
    }

    /// True only when `mode` is explicitly enabled.
    pub fn supports(&self, mode: FulfillmentMode) -> bool {
        self.offers(mode) == Some(true)
    }

    /// True only when `mode` is explicitly disabled.
    pub fn rules_out(&self, mode: FulfillmentMode) -> bool {
        self.offers(mode) == Some(false)
    }

    /// Parses the stored JSON flags. Malformed data leaves every flag unknown.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => serde_json::from_str(s).unwrap_or_default(),
            other => serde_json::from_value(other.clone()).unwrap_or_default(),
        }
    }
}

/// An approved vendor as seen by store resolution.
///
/// Snapshot taken per request (or per cache refresh); never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCandidate {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub service_area: Option<ServiceArea>,
    pub fulfillment: FulfillmentModes,
    pub hours: OperatingHours,
    pub minimum_order: f64,
    /// Per-vendor delivery radius, distinct from the cross-vendor search radius.
    pub service_radius_km: Option<f64>,
    pub approved: bool,
}

impl VendorCandidate {
    /// Creates a candidate with only identity set; remaining fields are empty.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: None,
            logo_url: None,
            description: None,
            phone: None,
            email: None,
            address: None,
            coordinate: None,
            service_area: None,
            fulfillment: FulfillmentModes::default(),
            hours: OperatingHours::default(),
            minimum_order: 0.0,
            service_radius_km: None,
            approved: true,
        }
    }

    /// The declared area, if it resolved to at least one postal code.
    pub fn usable_service_area(&self) -> Option<&ServiceArea> {
        self.service_area.as_ref().filter(|area| area.is_usable())
    }
}
