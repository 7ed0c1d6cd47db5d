//! Liveness probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
    pub checked_at: DateTime<Utc>,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health_check(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<HealthResponse>)> {
    let database = state.db.health_check().await;
    let (migrations_total, migrations_applied) = if database {
        state.db.migration_status().await?
    } else {
        (0, 0)
    };

    let status = if database {
        StatusCode::OK
    } else {
        tracing::warn!("Health check: database unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database,
            migrations_applied,
            migrations_total,
            checked_at: Utc::now(),
        }),
    ))
}
