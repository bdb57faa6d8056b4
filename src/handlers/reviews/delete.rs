// handlers/reviews/delete.rs - DELETE /reviews/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::database::models::Review;
use crate::database::Repository;
use crate::filter::collection::REVIEWS;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, ReviewService};
use crate::state::AppState;

use super::not_found_message;

pub async fn review_delete(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let review = Repository::<Review>::new(&REVIEWS, state.pool.clone())
        .select_404(id, not_found_message(id))
        .await?;
    ensure_owner(&account, review.account_id, "delete this review")?;

    ReviewService::new(state.pool.clone()).delete(review.id).await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageRating(review.listing_id))
        .await;

    Ok(ApiResponse::empty())
}
