//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using API tokens from the `Authorization` header.
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// Tokens are issued with `admin token create`. The token is hashed with the
/// server's signing secret and looked up among non-revoked tokens; on success
/// its `last_used_at` is refreshed.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header
/// is missing or malformed, or the token is unknown or revoked.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    st.auth_service.authenticate(&token).await?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
