//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkListResponse, LinkResponse, ListLinksParams, UpdateLinkRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /link`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` with the stored link, including its full `short_url`.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(payload.url).await?;
    let short_url = state.short_url(&link.hash);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists live links, newest first.
///
/// # Endpoint
///
/// `GET /link?limit=25&offset=0`
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` is outside `1..=1000` or `offset` is negative.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (limit, offset) = params.limit_offset()?;

    let page = state.link_service.list(limit, offset).await?;

    let links = page
        .links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.hash);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        links,
        count: page.count,
    }))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /link/{id}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://new-destination.com", "hash": "my-link" }
/// ```
///
/// Both fields are optional, but at least one must be present.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the link doesn't exist or was deleted.
/// Returns 409 Conflict if the hash belongs to another link.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update(id, payload.into()).await?;
    let short_url = state.short_url(&link.hash);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Soft-deletes a link.
///
/// # Endpoint
///
/// `DELETE /link/{id}`
///
/// The row is kept with `deleted_at` set: the link stops redirecting and
/// disappears from listings, but its hash is never handed out again.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or is already deleted.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(id).await?;

    Ok(StatusCode::OK)
}
