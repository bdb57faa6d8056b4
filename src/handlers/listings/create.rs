// handlers/listings/create.rs - POST /listings handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::database::models::Listing;
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::collection::LISTINGS;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{Geocoder, ListingInput, ListingService};
use crate::state::AppState;

/// Create a listing owned by the caller. A non-admin may publish only one.
pub async fn listing_create(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    body: Result<Json<ListingInput>, JsonRejection>,
) -> ApiResult<Listing> {
    let Json(input) = body?;
    input.validate_new()?;

    if !account.is_admin() {
        let published = Repository::<Listing>::new(&LISTINGS, state.pool.clone())
            .count_by("account_id", account.id)
            .await?;
        if published > 0 {
            return Err(ApiError::bad_request(format!(
                "The user with ID {} has already published a listing",
                account.id
            )));
        }
    }

    let address = input.address.as_deref().unwrap_or_default().trim();
    let location = state.geocoder.geocode(address).await?;

    let listing = ListingService::new(state.pool.clone())
        .create(&input, account.id, Some(location))
        .await?;

    Ok(ApiResponse::created(listing))
}
