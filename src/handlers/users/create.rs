// handlers/users/create.rs - POST /users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::hash_password;
use crate::database::models::{Account, Role};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountInput, AccountService};
use crate::state::AppState;

pub async fn user_create(
    State(state): State<AppState>,
    body: Result<Json<AccountInput>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(input) = body?;
    input.validate_new()?;

    let password_hash = hash_password(input.password.as_deref().unwrap_or_default())?;
    let account = AccountService::new(state.pool.clone())
        .create(
            input.name.as_deref().unwrap_or_default(),
            input.email.as_deref().unwrap_or_default(),
            input.role.unwrap_or(Role::User),
            &password_hash,
        )
        .await?;

    Ok(ApiResponse::created(account))
}
