//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::VendorCandidate;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Which slice of the approved vendors a cached entry holds.
///
/// Searches with a postal code consider area vendors without coordinates too,
/// so they read the full set; coordinate-only searches read the smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateScope {
    /// Vendors with both latitude and longitude.
    Located,
    All,
}

impl CandidateScope {
    pub fn for_query(requires_coordinates: bool) -> Self {
        if requires_coordinates {
            Self::Located
        } else {
            Self::All
        }
    }

    pub fn requires_coordinates(self) -> bool {
        matches!(self, Self::Located)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Located => "located",
            Self::All => "all",
        }
    }
}

/// Trait for caching the approved-vendor candidate set.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures degrade to database reads).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached candidates for a scope.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(candidates))` on cache hit
    /// - `Ok(None)` on cache miss, undecodable entry or backend error (fail-open)
    async fn get_candidates(&self, scope: CandidateScope)
    -> CacheResult<Option<Vec<VendorCandidate>>>;

    /// Stores the candidates for a scope with an optional TTL.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log and
    /// return `Ok(())`.
    async fn set_candidates(
        &self,
        scope: CandidateScope,
        candidates: &[VendorCandidate],
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Drops every cached scope. Returns the number of entries removed.
    async fn invalidate(&self) -> CacheResult<usize>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Whether entries are actually stored. Callers skip refresh
    /// coordination when this is false.
    fn is_enabled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_selection() {
        assert_eq!(CandidateScope::for_query(true), CandidateScope::Located);
        assert_eq!(CandidateScope::for_query(false), CandidateScope::All);
        assert!(CandidateScope::Located.requires_coordinates());
        assert!(!CandidateScope::All.requires_coordinates());
        assert_ne!(CandidateScope::Located.key(), CandidateScope::All.key());
    }
}
