// handlers/health.rs - GET /health handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Liveness plus a database round trip; 503 when the database is unreachable
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    DatabaseManager::health_check(&state.pool).await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "database": "connected",
        "environment": format!("{:?}", state.config.environment).to_lowercase(),
    })))
}
