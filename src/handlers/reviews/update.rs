// handlers/reviews/update.rs - PUT /reviews/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Review;
use crate::database::Repository;
use crate::filter::collection::REVIEWS;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, ReviewInput, ReviewService};
use crate::state::AppState;

use super::not_found_message;

pub async fn review_update(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
    body: Result<Json<ReviewInput>, JsonRejection>,
) -> ApiResult<Review> {
    let id = parse_id(&id)?;
    let review = Repository::<Review>::new(&REVIEWS, state.pool.clone())
        .select_404(id, not_found_message(id))
        .await?;
    ensure_owner(&account, review.account_id, "update this review")?;

    let Json(input) = body?;
    input.validate_update()?;

    let updated = ReviewService::new(state.pool.clone())
        .update(review.id, &input)
        .await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageRating(updated.listing_id))
        .await;

    Ok(ApiResponse::success(updated))
}
