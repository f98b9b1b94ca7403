//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService, CandidateScope};
use crate::domain::entities::VendorCandidate;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured. Every read is a miss, so each
/// search loads a fresh candidate snapshot from the database.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_candidates(
        &self,
        _scope: CandidateScope,
    ) -> CacheResult<Option<Vec<VendorCandidate>>> {
        Ok(None)
    }

    async fn set_candidates(
        &self,
        _scope: CandidateScope,
        _candidates: &[VendorCandidate],
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self) -> CacheResult<usize> {
        Ok(0)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
