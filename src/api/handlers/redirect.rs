//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short hash to its original URL.
///
/// # Endpoint
///
/// `GET /{hash}`
///
/// # Click Tracking
///
/// After a successful lookup a `LinkVisited` event is scheduled on a
/// detached task and the redirect is returned without waiting for it.
/// The visitor gets the same response whether or not the click is counted.
///
/// # Errors
///
/// Returns 404 Not Found if the hash is unknown or its link was deleted.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&hash).await?;

    // Not awaited.
    let _ = state.click_publisher.link_visited(link.id);

    Ok(Redirect::temporary(&link.url))
}
