//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /link`, `GET /{hash}` - public, rate limited
//! - `GET /link`, `PATCH|DELETE /link/{id}`, `GET /stat` - Bearer token, stricter rate limit
//! - `GET /health` - public
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket keyed by the peer address
//! - **Authentication** - Bearer token on management routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let public = api::routes::public_routes().layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
