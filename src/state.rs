//! Shared application state injected into handlers.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

use crate::application::services::{DeliveryService, StoreService};
use crate::config::Config;
use crate::domain::repositories::VendorRepository;
use crate::domain::resolver::DEFAULT_MAX_DISTANCE_KM;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geocoding::Geocoder;

#[derive(Clone)]
pub struct AppState {
    pub store_service: Arc<StoreService>,
    pub delivery_service: Arc<DeliveryService>,
    /// Used directly only by the health check.
    pub vendor_repository: Arc<dyn VendorRepository>,
    pub cache: Arc<dyn CacheService>,
    /// `None` when `GEOCODER_URL` is not configured.
    pub geocoder: Option<Arc<dyn Geocoder>>,
    pub search: SearchSettings,
}

/// Request-independent knobs of the nearby search.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub default_max_distance_km: f64,
    /// Offset of the time zone vendor opening hours are written in.
    pub business_utc_offset: FixedOffset,
    pub expose_diagnostics: bool,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_max_distance_km: config.default_max_distance_km,
            business_utc_offset: config.business_utc_offset,
            expose_diagnostics: config.expose_diagnostics,
        }
    }

    /// Current wall-clock time in the business time zone.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.business_utc_offset)
            .naive_local()
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            business_utc_offset: Utc.fix(),
            expose_diagnostics: false,
        }
    }
}
