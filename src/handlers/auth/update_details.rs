// handlers/auth/update_details.rs - PUT /auth/updatedetails handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::Account;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AccountInput, AccountService};
use crate::state::AppState;

/// Only name and email can be changed here; role and password have their own paths
#[derive(Debug, Deserialize)]
pub struct UpdateDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_details(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    body: Result<Json<UpdateDetails>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(details) = body?;

    AccountInput {
        name: details.name.clone(),
        email: details.email.clone(),
        ..Default::default()
    }
    .validate_update()?;

    let updated = AccountService::new(state.pool.clone())
        .update(account.id, details.name.as_deref(), details.email.as_deref(), None, None)
        .await?;

    Ok(ApiResponse::success(updated))
}
