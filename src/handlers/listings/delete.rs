// handlers/listings/delete.rs - DELETE /listings/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::ListingService;
use crate::state::AppState;

use super::load_listing;

/// Removes the listing together with its courses and reviews
pub async fn listing_delete(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let listing = load_listing(&state.pool, id).await?;
    ensure_owner(&account, listing.account_id, "delete this listing")?;

    ListingService::new(state.pool.clone()).delete(listing.id).await?;

    Ok(ApiResponse::empty())
}
