use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::database::models::{Account, Role};
use crate::error::ApiError;
use crate::services::AccountService;
use crate::state::AppState;

pub const PUBLISHERS: &[Role] = &[Role::Publisher, Role::Admin];
pub const REVIEWERS: &[Role] = &[Role::User, Role::Admin];
pub const ADMINS: &[Role] = &[Role::Admin];

/// Account resolved from the bearer token, bound to the request by [`protect`]
#[derive(Clone, Debug)]
pub struct AuthAccount(pub Account);

/// Resolve the caller from `Authorization: Bearer <token>` and bind it to the
/// request. Missing, invalid or expired tokens and deleted accounts are 401.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;
    let account_id = state.tokens.verify(token)?;

    let account = AccountService::new(state.pool.clone())
        .find(account_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(%account_id, "token subject no longer exists");
            ApiError::from(AuthError::MissingToken)
        })?;

    request.extensions_mut().insert(AuthAccount(account));
    Ok(next.run(request).await)
}

/// Role gate layered inside [`protect`]
pub async fn authorize(
    State(roles): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let AuthAccount(account) = request
        .extensions()
        .get::<AuthAccount>()
        .ok_or(AuthError::MissingToken)?;

    if !roles.contains(&account.role) {
        return Err(ApiError::forbidden(format!(
            "User role {} is unauthorized to access this route",
            account.role
        )));
    }
    Ok(next.run(request).await)
}

/// Bearer token from the Authorization header. Cookies are not consulted.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ascii authorization header".to_string()))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}

pub fn is_owner_or_admin(account: &Account, owner_id: Uuid) -> bool {
    account.id == owner_id || account.is_admin()
}

/// 403 unless `account` owns the resource or is an admin
pub fn ensure_owner(account: &Account, owner_id: Uuid, action: &str) -> Result<(), ApiError> {
    if is_owner_or_admin(account, owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "User {} is not authorized to {}",
            account.id, action
        )))
    }
}
