//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! cache calls. Services consume repository traits and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::store_service::StoreService`] - Nearby-store lookups over cached candidates
//! - [`services::delivery_service::DeliveryService`] - Per-vendor delivery checks

pub mod services;
