// handlers/auth/logout.rs - GET /auth/logout handler

use axum::extract::State;
use serde_json::Value;

use crate::auth::cookie::cleared_token_cookie;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// Overwrite the session cookie. Bearer tokens stay valid until they expire.
pub async fn logout(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::empty().with_cookie(cleared_token_cookie(state.config.security.secure_cookies))
}
