//! Per-IP rate limiting using a token bucket.
//!
//! Limits are keyed by the socket peer address, so the router must be
//! served with connect info. Requests over the limit receive
//! `429 Too Many Requests`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Search endpoints: 5 requests per second, burst of 50.
///
/// A storefront page issues a nearby lookup plus one delivery check per
/// product card, hence the generous burst.
pub fn layer() -> RateLimitLayer {
    per_ip(5, 50)
}

/// Geocoding: 1 request per second, burst of 10.
///
/// Geocoding proxies a third-party API with its own usage policy.
pub fn geocode_layer() -> RateLimitLayer {
    per_ip(1, 10)
}

fn per_ip(per_second: u64, burst: u32) -> RateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
