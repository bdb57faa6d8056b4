// handlers/reviews/create.rs - POST /listings/:listing_id/reviews handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Review;
use crate::handlers::listings::load_listing;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, ReviewInput, ReviewService};
use crate::state::AppState;

/// One review per listing and account; a second attempt is a 400 duplicate
pub async fn review_create(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(listing_id): Path<String>,
    body: Result<Json<ReviewInput>, JsonRejection>,
) -> ApiResult<Review> {
    let listing_id = parse_id(&listing_id)?;
    let listing = load_listing(&state.pool, listing_id).await?;

    let Json(input) = body?;
    input.validate_new()?;

    let review = ReviewService::new(state.pool.clone())
        .create(&input, listing.id, account.id)
        .await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageRating(listing.id))
        .await;

    Ok(ApiResponse::created(review))
}
