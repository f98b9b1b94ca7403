//! Nearby-store lookup service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::VendorCandidate;
use crate::domain::repositories::VendorRepository;
use crate::domain::resolver::{NearbyQuery, Resolution, resolve};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CandidateScope};

/// Finds the stores that can serve a customer.
///
/// Candidates come from the cache when it is enabled; a miss reloads them
/// from the repository under a per-scope lock so concurrent misses trigger
/// a single database read. Every source read is bounded by a timeout and a
/// timeout surfaces as [`AppError::Unavailable`], never as an empty result.
pub struct StoreService {
    vendor_repository: Arc<dyn VendorRepository>,
    cache: Arc<dyn CacheService>,
    source_timeout: Duration,
    cache_ttl_seconds: Option<u64>,
    located_refresh: Mutex<()>,
    all_refresh: Mutex<()>,
}

impl StoreService {
    pub fn new(
        vendor_repository: Arc<dyn VendorRepository>,
        cache: Arc<dyn CacheService>,
        source_timeout: Duration,
    ) -> Self {
        Self {
            vendor_repository,
            cache,
            source_timeout,
            cache_ttl_seconds: None,
            located_refresh: Mutex::new(()),
            all_refresh: Mutex::new(()),
        }
    }

    /// Overrides the cache's default TTL for candidate snapshots.
    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Resolves the stores eligible for `query`, nearest first.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the query is out of range
    /// - [`AppError::Unavailable`] if vendors cannot be loaded in time
    pub async fn find_nearby(&self, query: &NearbyQuery) -> Result<Resolution, AppError> {
        query.validate()?;

        let scope = CandidateScope::for_query(query.requires_vendor_coordinates());
        let candidates = self.load_candidates(scope).await?;

        let resolution = resolve(&candidates, query);
        let outcome = match resolution.report.empty_reason() {
            Some(reason) => reason.as_str(),
            None => "found",
        };
        metrics::counter!("store_resolutions_total", "outcome" => outcome).increment(1);

        tracing::debug!(
            candidates = resolution.report.candidates,
            area_matches = resolution.report.area_matches,
            distance_matches = resolution.report.distance_matches,
            returned = resolution.report.returned,
            outcome,
            "Resolved nearby stores"
        );

        Ok(resolution)
    }

    /// Drops cached candidate snapshots. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the cache backend rejects the delete.
    pub async fn invalidate_candidates(&self) -> Result<usize, AppError> {
        self.cache.invalidate().await.map_err(|e| {
            AppError::unavailable("Cache is unavailable", json!({ "reason": e.to_string() }))
        })
    }

    async fn load_candidates(&self, scope: CandidateScope) -> Result<Vec<VendorCandidate>, AppError> {
        if !self.cache.is_enabled() {
            return self.fetch_from_source(scope).await;
        }

        if let Some(candidates) = self.cached(scope).await {
            metrics::counter!("candidate_cache_total", "result" => "hit").increment(1);
            return Ok(candidates);
        }

        let _guard = self.refresh_lock(scope).lock().await;

        // Another request may have refreshed while we waited.
        if let Some(candidates) = self.cached(scope).await {
            metrics::counter!("candidate_cache_total", "result" => "coalesced").increment(1);
            return Ok(candidates);
        }

        metrics::counter!("candidate_cache_total", "result" => "miss").increment(1);
        let candidates = self.fetch_from_source(scope).await?;

        if let Err(e) = self
            .cache
            .set_candidates(scope, &candidates, self.cache_ttl_seconds)
            .await
        {
            tracing::warn!("Failed to cache {} candidates: {}", scope.key(), e);
        }

        Ok(candidates)
    }

    async fn cached(&self, scope: CandidateScope) -> Option<Vec<VendorCandidate>> {
        match self.cache.get_candidates(scope).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", scope.key(), e);
                None
            }
        }
    }

    async fn fetch_from_source(
        &self,
        scope: CandidateScope,
    ) -> Result<Vec<VendorCandidate>, AppError> {
        let fetch = self
            .vendor_repository
            .fetch_approved(scope.requires_coordinates());

        match tokio::time::timeout(self.source_timeout, fetch).await {
            Ok(result) => {
                let candidates = result?;
                tracing::debug!("Loaded {} {} candidates", candidates.len(), scope.key());
                Ok(candidates)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.source_timeout.as_millis() as u64,
                    "Vendor source timed out"
                );
                Err(AppError::unavailable(
                    "Vendor data source timed out",
                    json!({ "retryable": true }),
                ))
            }
        }
    }

    fn refresh_lock(&self, scope: CandidateScope) -> &Mutex<()> {
        match scope {
            CandidateScope::Located => &self.located_refresh,
            CandidateScope::All => &self.all_refresh,
        }
    }
}
