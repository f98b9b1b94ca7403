//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgVendorRepository`] - Approved-vendor reads for store resolution

pub mod pg_vendor_repository;

pub use pg_vendor_repository::PgVendorRepository;
