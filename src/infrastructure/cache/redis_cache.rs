//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CandidateScope};
use crate::domain::entities::VendorCandidate;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const SCOPES: [CandidateScope; 2] = [CandidateScope::Located, CandidateScope::All];

/// Redis cache for the candidate set, stored as one JSON document per scope.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// All operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_candidates`]
    ///   is called with `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "stores:candidates:".to_string(),
        })
    }

    fn build_key(&self, scope: CandidateScope) -> String {
        format!("{}{}", self.key_prefix, scope.key())
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_candidates(
        &self,
        scope: CandidateScope,
    ) -> CacheResult<Option<Vec<VendorCandidate>>> {
        let key = self.build_key(scope);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<VendorCandidate>>(&payload) {
                Ok(candidates) => {
                    debug!("Cache HIT: {} ({} candidates)", key, candidates.len());
                    Ok(Some(candidates))
                }
                Err(e) => {
                    // Written by an older build; treat as a miss so it gets replaced.
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_candidates(
        &self,
        scope: CandidateScope,
        candidates: &[VendorCandidate],
        ttl: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(scope);
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        let payload = match serde_json::to_string(candidates) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode candidates for {}: {}", key, e);
                return Ok(());
            }
        };

        let mut conn = self.client.clone();
        match conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds).await {
            Ok(_) => {
                debug!(
                    "Cache SET: {} ({} candidates, TTL: {}s)",
                    key,
                    candidates.len(),
                    ttl_seconds
                );
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self) -> CacheResult<usize> {
        let keys: Vec<String> = SCOPES.iter().map(|s| self.build_key(*s)).collect();
        let mut conn = self.client.clone();

        match conn.del::<_, usize>(&keys).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {} entries", deleted);
                }
                Ok(deleted)
            }
            Err(e) => {
                warn!("Redis DEL error: {}", e);
                Err(CacheError::OperationError(e.to_string()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
