// handlers/users/delete.rs - DELETE /users/:id handler

use axum::extract::{Path, State};
use serde_json::Value;

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;
use crate::state::AppState;

use super::not_found_message;

/// Accounts that still own listings, courses or reviews cannot be removed
pub async fn user_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let removed = AccountService::new(state.pool.clone()).delete(id).await?;
    if !removed {
        return Err(ApiError::not_found(not_found_message(id)));
    }
    tracing::info!(account_id = %id, "account deleted");
    Ok(ApiResponse::empty())
}
