// handlers/auth/update_password.rs - PUT /auth/updatepassword handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::middleware::{AuthAccount, TokenResponse};
use crate::services::validation::Violations;
use crate::services::AccountService;
use crate::state::AppState;

use super::send_token_response;

#[derive(Debug, Deserialize)]
pub struct UpdatePassword {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Requires the current password; answers with a fresh session token
pub async fn update_password(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    body: Result<Json<UpdatePassword>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(request) = body?;

    let mut v = Violations::new();
    v.require(request.current_password.as_deref(), "Please provide your current password");
    if let Some(new_password) = v.require(request.new_password.as_deref(), "Please add a password") {
        v.check(
            new_password.chars().count() >= MIN_PASSWORD_LENGTH,
            "Password must be at least 6 characters",
        );
    }
    v.into_result()?;

    let current = request.current_password.as_deref().unwrap_or_default();
    if !verify_password(current, &account.password) {
        return Err(ApiError::unauthorized("Password is incorrect"));
    }

    let password_hash = hash_password(request.new_password.as_deref().unwrap_or_default())?;
    let updated = AccountService::new(state.pool.clone())
        .set_password(account.id, &password_hash)
        .await?;

    tracing::info!(account_id = %updated.id, "password changed");
    send_token_response(&state, &updated, StatusCode::OK)
}
