//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and geocoding.
//!
//! # Modules
//!
//! - [`cache`] - Candidate-set caching (Redis and no-op implementations)
//! - [`geocoding`] - Address and reverse geocoding over HTTP
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod geocoding;
pub mod persistence;
