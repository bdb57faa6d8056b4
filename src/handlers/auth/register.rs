// handlers/auth/register.rs - POST /auth/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::auth::hash_password;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::middleware::TokenResponse;
use crate::services::{AccountInput, AccountService};
use crate::state::AppState;

use super::send_token_response;

/// Create an account and sign it in. Only `user` and `publisher` may be chosen.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<AccountInput>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(input) = body?;
    input.validate_new()?;
    input.validate_self_service_role()?;

    let password = input.password.as_deref().unwrap_or_default();
    let password_hash = hash_password(password)?;

    let account = AccountService::new(state.pool.clone())
        .create(
            input.name.as_deref().unwrap_or_default(),
            input.email.as_deref().unwrap_or_default(),
            input.role.unwrap_or(Role::User),
            &password_hash,
        )
        .await?;

    send_token_response(&state, &account, StatusCode::OK)
}
