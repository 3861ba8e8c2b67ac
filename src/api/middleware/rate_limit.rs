//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
};

/// Governor layer keyed by the peer socket address.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for public endpoints (link creation and redirects).
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// The server must be started with `into_make_service_with_connect_info`
/// so the peer address is available.
pub fn layer() -> RateLimitLayer {
    build(2, 100)
}

/// Stricter rate limiter for authenticated management endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> RateLimitLayer {
    build(1, 10)
}

fn build(per_second: u64, burst_size: u32) -> RateLimitLayer {
    // `finish` only fails for a zero period or burst.
    let governor_conf: GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>> =
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .unwrap_or_default();

    GovernorLayer::new(Arc::new(governor_conf))
}
