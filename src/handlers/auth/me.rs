// handlers/auth/me.rs - GET /auth/me handler

use axum::Extension;

use crate::database::models::Account;
use crate::middleware::{ApiResponse, AuthAccount};

pub async fn me(Extension(AuthAccount(account)): Extension<AuthAccount>) -> ApiResponse<Account> {
    ApiResponse::success(account)
}
