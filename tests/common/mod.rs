#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use store_locator::application::services::{DeliveryService, StoreService};
use store_locator::domain::entities::{FulfillmentModes, OperatingHours, VendorCandidate};
use store_locator::domain::geo::Coordinate;
use store_locator::domain::repositories::VendorRepository;
use store_locator::domain::service_area::ServiceArea;
use store_locator::error::AppError;
use store_locator::infrastructure::cache::NullCache;
use store_locator::infrastructure::geocoding::Geocoder;
use store_locator::state::{AppState, SearchSettings};

/// Zócalo, Mexico City.
pub const ORIGIN: Coordinate = Coordinate::new(19.4326, -99.1332);

/// Vendor store kept in memory so handler tests run without PostgreSQL.
#[derive(Default)]
pub struct InMemoryVendorRepository {
    vendors: Mutex<Vec<VendorCandidate>>,
    failing: bool,
}

impl InMemoryVendorRepository {
    pub fn new(vendors: Vec<VendorCandidate>) -> Self {
        Self {
            vendors: Mutex::new(vendors),
            failing: false,
        }
    }

    /// A repository whose every call fails as an unreachable database would.
    pub fn failing() -> Self {
        Self {
            vendors: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl VendorRepository for InMemoryVendorRepository {
    async fn fetch_approved(
        &self,
        require_coordinates: bool,
    ) -> Result<Vec<VendorCandidate>, AppError> {
        self.check()?;
        Ok(self
            .vendors
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.approved)
            .filter(|v| !require_coordinates || v.coordinate.is_some())
            .cloned()
            .collect())
    }

    async fn find_approved(&self, id: i64) -> Result<Option<VendorCandidate>, AppError> {
        self.check()?;
        Ok(self
            .vendors
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id && v.approved)
            .cloned())
    }

    async fn count_approved(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.vendors.lock().unwrap().iter().filter(|v| v.approved).count() as i64)
    }
}

pub struct VendorBuilder(VendorCandidate);

impl VendorBuilder {
    pub fn new(id: i64, name: &str) -> Self {
        Self(VendorCandidate::new(id, name))
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.0.coordinate = Some(Coordinate::new(latitude, longitude));
        self
    }

    pub fn area(mut self, area: Value) -> Self {
        self.0.service_area = ServiceArea::from_json(&area);
        self
    }

    pub fn modes(mut self, modes: Value) -> Self {
        self.0.fulfillment = FulfillmentModes::from_json(&modes);
        self
    }

    pub fn hours(mut self, hours: Value) -> Self {
        self.0.hours = OperatingHours::from_json(&hours);
        self
    }

    pub fn radius(mut self, km: f64) -> Self {
        self.0.service_radius_km = Some(km);
        self
    }

    pub fn unapproved(mut self) -> Self {
        self.0.approved = false;
        self
    }

    pub fn build(self) -> VendorCandidate {
        self.0
    }
}

pub fn create_test_state(vendors: Vec<VendorCandidate>) -> AppState {
    create_test_state_with(
        Arc::new(InMemoryVendorRepository::new(vendors)),
        None,
        SearchSettings::default(),
    )
}

pub fn create_test_state_with(
    repository: Arc<dyn VendorRepository>,
    geocoder: Option<Arc<dyn Geocoder>>,
    search: SearchSettings,
) -> AppState {
    let cache = Arc::new(NullCache::new());

    let store_service = StoreService::new(repository.clone(), cache.clone(), Duration::from_secs(5));
    let delivery_service = DeliveryService::new(repository.clone(), 10.0);

    AppState {
        store_service: Arc::new(store_service),
        delivery_service: Arc::new(delivery_service),
        vendor_repository: repository,
        cache,
        geocoder,
        search,
    }
}
