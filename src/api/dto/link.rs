//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{Link, LinkPatch};
use crate::error::AppError;

pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 1000;

/// Request body for `POST /link`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Request body for `PATCH /link/{id}`.
///
/// Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    pub hash: Option<String>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            url: req.url,
            hash: req.hash,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub hash: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            url: link.url,
            hash: link.hash,
            short_url,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response body for `GET /link`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    /// Total number of live links, independent of `limit`/`offset`.
    pub count: i64,
}

/// Query parameters for `GET /link`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListLinksParams {
    /// Applies defaults and bounds, returning `(limit, offset)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is outside `1..=1000`
    /// or `offset` is negative.
    pub fn limit_offset(&self) -> Result<(i64, i64), AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(
                format!("limit must be between 1 and {MAX_LIMIT}"),
                json!({ "limit": limit }),
            ));
        }

        if offset < 0 {
            return Err(AppError::bad_request(
                "offset must not be negative",
                json!({ "offset": offset }),
            ));
        }

        Ok((limit, offset))
    }
}
