//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, redirect_handler,
    stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Routes open to anonymous visitors.
///
/// # Endpoints
///
/// - `POST /link`    - Shorten a URL
/// - `GET  /{hash}`  - Redirect to the original URL and record the click
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/link", post(create_link_handler))
        .route("/{hash}", get(redirect_handler))
}

/// Routes requiring Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /link`       - List links (`limit`, `offset`)
/// - `PATCH  /link/{id}`  - Change a link's URL and/or hash
/// - `DELETE /link/{id}`  - Soft-delete a link
/// - `GET    /stat`       - Clicks per day or month (`by`, `from`, `to`)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/link", get(list_links_handler))
        .route(
            "/link/{id}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route("/stat", get(stats_handler))
}
