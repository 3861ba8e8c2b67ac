//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: counts live links
/// 2. **Event bus**: at least one subscriber (the stat aggregator) is attached
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 42 links" },
///     "event_bus": { "status": "ok", "message": "1 subscriber(s), queue capacity 1024" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let bus_check = check_event_bus(&state);

    let all_healthy = db_check.is_ok() && bus_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            event_bus: bus_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.count().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} links")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

/// Clicks are silently dropped while nobody is subscribed.
fn check_event_bus(state: &AppState) -> CheckStatus {
    let subscribers = state.event_bus.subscriber_count();

    if subscribers == 0 {
        CheckStatus::error("No subscribers, clicks are not being recorded")
    } else {
        CheckStatus::ok(format!(
            "{} subscriber(s), queue capacity {}",
            subscribers,
            state.event_bus.capacity()
        ))
    }
}
