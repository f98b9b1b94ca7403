//! Business logic services for the application layer.

pub mod delivery_service;
pub mod store_service;

pub use delivery_service::DeliveryService;
pub use store_service::StoreService;
