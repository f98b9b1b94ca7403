//! Repository trait for reading vendor records.

use crate::domain::entities::VendorCandidate;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to approved vendors.
///
/// This service never writes vendor state; onboarding and moderation own the
/// records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVendorRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorRepository: Send + Sync {
    /// Loads every approved vendor.
    ///
    /// # Arguments
    ///
    /// - `require_coordinates` - If true, only vendors with both latitude and
    ///   longitude set are returned
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the database cannot be reached.
    async fn fetch_approved(&self, require_coordinates: bool)
    -> Result<Vec<VendorCandidate>, AppError>;

    /// Finds an approved vendor by ID. Unapproved vendors are not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the database cannot be reached.
    async fn find_approved(&self, id: i64) -> Result<Option<VendorCandidate>, AppError>;

    /// Counts approved vendors. Used by the health check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the database cannot be reached.
    async fn count_approved(&self) -> Result<i64, AppError>;
}
