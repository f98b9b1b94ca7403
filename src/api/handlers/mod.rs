//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod delivery;
pub mod geocode;
pub mod health;
pub mod nearby;

pub use delivery::delivery_handler;
pub use geocode::{geocode_handler, reverse_geocode_handler};
pub use health::health_handler;
pub use nearby::nearby_handler;
