//! DTOs for the aggregated click statistics endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::entities::GroupBy;
use crate::error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query parameters for `GET /stat`.
///
/// Kept as raw strings so that bad values become JSON validation errors
/// instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct StatQueryParams {
    pub by: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Validated form of [`StatQueryParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatQuery {
    pub group_by: GroupBy,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl StatQueryParams {
    /// Parses and defaults the parameters.
    ///
    /// - `by`: `day` or `month`, default `day`
    /// - `from`: `YYYY-MM-DD`, default the Unix epoch (no practical lower bound)
    /// - `to`: `YYYY-MM-DD`, default `today`
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown `by` or an unparseable date.
    pub fn parse(&self, today: NaiveDate) -> Result<StatQuery, AppError> {
        let group_by = match non_empty(&self.by) {
            None => GroupBy::default(),
            Some(by) => by.parse::<GroupBy>().map_err(|_| {
                AppError::bad_request(
                    "Invalid 'by' parameter",
                    json!({ "by": by, "allowed": ["day", "month"] }),
                )
            })?,
        };

        let from = parse_date("from", non_empty(&self.from))?
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH.date_naive());
        let to = parse_date("to", non_empty(&self.to))?.unwrap_or(today);

        Ok(StatQuery { group_by, from, to })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT).map_err(|_| {
                AppError::bad_request(
                    format!("Invalid '{name}' date"),
                    json!({ name: v, "expected": "YYYY-MM-DD" }),
                )
            })
        })
        .transpose()
}
