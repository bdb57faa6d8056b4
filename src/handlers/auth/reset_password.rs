// handlers/auth/reset_password.rs - PUT /auth/resetpassword/:token handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::auth::{hash_password, hash_reset_token};
use crate::error::ApiError;
use crate::middleware::TokenResponse;
use crate::services::validation::Violations;
use crate::services::AccountService;
use crate::state::AppState;

use super::send_token_response;

#[derive(Debug, Deserialize)]
pub struct ResetPassword {
    pub password: Option<String>,
}

/// Exchange an unexpired reset token for a new password and a session
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Result<Json<ResetPassword>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(request) = body?;
    let accounts = AccountService::new(state.pool.clone());

    let account = accounts
        .find_by_reset_token(&hash_reset_token(&token))
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;

    let mut v = Violations::new();
    if let Some(password) = v.require(request.password.as_deref(), "Please add a password") {
        v.check(
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            "Password must be at least 6 characters",
        );
    }
    v.into_result()?;

    let password_hash = hash_password(request.password.as_deref().unwrap_or_default())?;
    let updated = accounts.set_password(account.id, &password_hash).await?;

    tracing::info!(account_id = %updated.id, "password reset");
    send_token_response(&state, &updated, StatusCode::OK)
}
