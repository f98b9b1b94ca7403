//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data access; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for service tests.

pub mod vendor_repository;

pub use vendor_repository::VendorRepository;

#[cfg(test)]
pub use vendor_repository::MockVendorRepository;
