// handlers/users/update.rs - PUT /users/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::auth::hash_password;
use crate::database::models::Account;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountInput, AccountService};
use crate::state::AppState;

/// Partial update of any account field, including role and password
pub async fn user_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AccountInput>, JsonRejection>,
) -> ApiResult<Account> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    input.validate_update()?;

    // An absent password keeps the stored hash; a present one is always hashed
    let password_hash = input.password.as_deref().map(hash_password).transpose()?;

    let account = AccountService::new(state.pool.clone())
        .update(
            id,
            input.name.as_deref(),
            input.email.as_deref(),
            input.role,
            password_hash.as_deref(),
        )
        .await?;

    Ok(ApiResponse::success(account))
}
