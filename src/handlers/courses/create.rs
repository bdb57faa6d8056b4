// handlers/courses/create.rs - POST /listings/:listing_id/courses handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Course;
use crate::handlers::listings::load_listing;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, CourseInput, CourseService};
use crate::state::AppState;

/// Only the listing's owner (or an admin) may add courses to it
pub async fn course_create(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(listing_id): Path<String>,
    body: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<Course> {
    let listing_id = parse_id(&listing_id)?;
    let listing = load_listing(&state.pool, listing_id).await?;
    ensure_owner(
        &account,
        listing.account_id,
        &format!("add a course to listing {}", listing.id),
    )?;

    let Json(input) = body?;
    input.validate_new()?;

    let course = CourseService::new(state.pool.clone())
        .create(&input, listing.id, account.id)
        .await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageCost(listing.id))
        .await;

    Ok(ApiResponse::created(course))
}
