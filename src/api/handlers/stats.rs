//! Handler for aggregated click statistics.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::api::dto::stats::StatQueryParams;
use crate::domain::entities::PeriodStat;
use crate::error::AppError;
use crate::state::AppState;

/// Returns clicks summed over all links per day or month.
///
/// # Endpoint
///
/// `GET /stat?by=day&from=2024-01-01&to=2024-01-31`
///
/// # Query Parameters
///
/// - `by` (optional): `day` or `month` (default: `day`)
/// - `from` (optional): first date, `YYYY-MM-DD` (default: no lower bound)
/// - `to` (optional): last date, `YYYY-MM-DD` (default: today, UTC)
///
/// # Response
///
/// ```json
/// [
///   { "period": "2024-01-01", "sum": 3 },
///   { "period": "2024-01-03", "sum": 5 }
/// ]
/// ```
///
/// Periods without clicks are omitted.
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown `by`, a malformed date, or `from` after `to`.
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatQueryParams>,
) -> Result<Json<Vec<PeriodStat>>, AppError> {
    let query = params.parse(Utc::now().date_naive())?;

    let stats = state
        .stats_service
        .get_all(query.group_by, query.from, query.to)
        .await?;

    Ok(Json(stats))
}
