//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and geocoder setup, and the Axum
//! server lifecycle.

use crate::application::services::{DeliveryService, StoreService};
use crate::config::Config;
use crate::domain::repositories::VendorRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geocoding::{Geocoder, NominatimGeocoder};
use crate::infrastructure::persistence::PgVendorRepository;
use crate::routes::app_router;
use crate::state::{AppState, SearchSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Geocoder (when `GEOCODER_URL` is set)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The geocoder client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let geocoder: Option<Arc<dyn Geocoder>> = match &config.geocoder_url {
        Some(url) => {
            let client = NominatimGeocoder::new(
                url,
                config.geocoder_timeout_secs,
                config.geocoder_max_retries,
            )
            .context("Failed to build geocoder client")?;
            tracing::info!("Geocoding enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("Geocoding disabled");
            None
        }
    };

    let vendor_repository: Arc<dyn VendorRepository> =
        Arc::new(PgVendorRepository::new(Arc::new(pool)));

    let store_service = StoreService::new(
        vendor_repository.clone(),
        cache.clone(),
        Duration::from_secs(config.vendor_source_timeout_secs),
    )
    .with_cache_ttl(config.cache_ttl_seconds);
    let delivery_service =
        DeliveryService::new(vendor_repository.clone(), config.default_service_radius_km);

    let state = AppState {
        store_service: Arc::new(store_service),
        delivery_service: Arc::new(delivery_service),
        vendor_repository,
        cache,
        geocoder,
        search: SearchSettings::from_config(&config),
    };

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
