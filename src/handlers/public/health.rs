// handlers/public/health.rs - GET /api/health

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus database reachability. Answers 503 when the pool cannot reach the store.
pub async fn health_get(State(state): State<AppState>) -> ApiResult<Health> {
    let timestamp = Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => Ok(ApiResponse::success(Health {
            status: "ok",
            database: "ok",
            timestamp,
        })),
        Err(e) => {
            error!("Health check failed: {}", e);
            Ok(ApiResponse::with_status(
                Health {
                    status: "degraded",
                    database: "unavailable",
                    timestamp,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }
}
