// handlers/users/show.rs - GET /users/:id handler

use axum::extract::{Path, State};

use crate::database::models::Account;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;
use crate::state::AppState;

use super::not_found_message;

pub async fn user_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Account> {
    let id = parse_id(&id)?;
    let account = AccountService::new(state.pool.clone())
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(not_found_message(id)))?;
    Ok(ApiResponse::success(account))
}
