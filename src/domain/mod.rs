//! Domain layer: store discovery and service-area resolution.
//!
//! Everything here is synchronous and free of I/O except the repository
//! trait definitions.
//!
//! # Architecture
//!
//! - [`postal_code`] - Canonical five-digit postal codes
//! - [`service_area`] - Declared service areas and matching
//! - [`geo`] - Haversine distance and delivery-time estimates
//! - [`resolver`] - Nearby-store eligibility, filtering and ordering
//! - [`delivery`] - Single-vendor delivery check
//! - [`entities`] - Vendor read model and resolution output
//! - [`repositories`] - Data access trait definitions
//!
//! # Resolution Flow
//!
//! 1. [`crate::application::services::StoreService`] loads approved candidates
//! 2. [`resolver::resolve`] decides eligibility per vendor (area or distance)
//! 3. Fulfillment and opening-hours filters are applied
//! 4. Results are sorted by distance, unknown distances last

pub mod delivery;
pub mod entities;
pub mod geo;
pub mod postal_code;
pub mod repositories;
pub mod resolver;
pub mod service_area;
