// handlers/listings/update.rs - PUT /listings/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Listing;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{Geocoder, ListingInput, ListingService};
use crate::state::AppState;

use super::load_listing;

/// Partial update by the owner or an admin. A new address is geocoded again.
pub async fn listing_update(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
    body: Result<Json<ListingInput>, JsonRejection>,
) -> ApiResult<Listing> {
    let id = parse_id(&id)?;
    let listing = load_listing(&state.pool, id).await?;
    ensure_owner(&account, listing.account_id, "update this listing")?;

    let Json(input) = body?;
    input.validate_update()?;

    let location = match input.address.as_deref() {
        Some(address) => Some(state.geocoder.geocode(address.trim()).await?),
        None => None,
    };

    let updated = ListingService::new(state.pool.clone())
        .update(listing.id, &input, location)
        .await?;

    Ok(ApiResponse::success(updated))
}
