// handlers/auth/mod.rs - Session and account self-service handlers
//
// Register, login, forgot-password and reset-password are public. The rest
// run behind `protect` and read the caller from the `AuthAccount` extension.

use axum::http::StatusCode;

use crate::auth::cookie::token_cookie;
use crate::database::models::Account;
use crate::error::ApiError;
use crate::middleware::TokenResponse;
use crate::state::AppState;

pub mod forgot_password; // POST /auth/forgotpassword
pub mod login;           // POST /auth/login
pub mod logout;          // GET /auth/logout
pub mod me;              // GET /auth/me
pub mod register;        // POST /auth/register
pub mod reset_password;  // PUT /auth/resetpassword/:token
pub mod update_details;  // PUT /auth/updatedetails
pub mod update_password; // PUT /auth/updatepassword

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use me::me;
pub use register::register;
pub use reset_password::reset_password;
pub use update_details::update_details;
pub use update_password::update_password;

/// Issue a session token for `account` and return it in the body and cookie
pub(crate) fn send_token_response(
    state: &AppState,
    account: &Account,
    status_code: StatusCode,
) -> Result<TokenResponse, ApiError> {
    let token = state.tokens.issue(account.id)?;
    let security = &state.config.security;
    let cookie = token_cookie(&token, security.cookie_expiry_days, security.secure_cookies);

    Ok(TokenResponse {
        token,
        cookie,
        status_code,
    })
}
