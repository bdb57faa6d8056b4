// handlers/auth/login.rs - POST /auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::{verify_password, AuthError};
use crate::error::ApiError;
use crate::middleware::TokenResponse;
use crate::services::AccountService;
use crate::state::AppState;

use super::send_token_response;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Unknown email and wrong password are indistinguishable to the client
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(request) = body?;

    let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::bad_request("Please provide an email and password")),
    };

    let account = AccountService::new(state.pool.clone())
        .find_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &account.password) {
        tracing::info!(account_id = %account.id, "login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    send_token_response(&state, &account, StatusCode::OK)
}
