// handlers/auth/forgot_password.rs - POST /auth/forgotpassword handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;

use crate::auth::ResetToken;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountService, EmailMessage, Mailer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotPassword {
    pub email: Option<String>,
}

/// Store a hashed reset token and mail the plaintext link. If the mail cannot
/// be sent the token is cleared again.
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ForgotPassword>, JsonRejection>,
) -> ApiResult<String> {
    let Json(request) = body?;
    let accounts = AccountService::new(state.pool.clone());

    let email = request.email.as_deref().unwrap_or_default();
    let account = accounts
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("There is no user with that email"))?;

    let token = ResetToken::generate();
    accounts
        .store_reset_token(account.id, Some((&token.hashed, token.expires_at)))
        .await?;

    let reset_url = reset_url(&state, &headers, &token.plain);
    let message = EmailMessage {
        to: account.email.clone(),
        subject: "Password reset token".to_string(),
        text: format!(
            "You are receiving this email because you (or someone else) has requested \
the reset of a password. Please make a PUT request to: \n\n {}",
            reset_url
        ),
    };

    if let Err(e) = state.mailer.send(message).await {
        tracing::error!(account_id = %account.id, "Reset email failed: {}", e);
        accounts.store_reset_token(account.id, None).await?;
        return Err(ApiError::InternalServerError("Email could not be sent".to_string()));
    }

    Ok(ApiResponse::success("Email sent".to_string()))
}

fn reset_url(state: &AppState, headers: &HeaderMap, plain: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = if state.config.security.secure_cookies { "https" } else { "http" };
    format!(
        "{}://{}{}/auth/resetpassword/{}",
        scheme, host, state.config.api.prefix, plain
    )
}
