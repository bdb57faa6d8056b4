// handlers/courses/update.rs - PUT /courses/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Course;
use crate::database::Repository;
use crate::filter::collection::COURSES;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, CourseInput, CourseService};
use crate::state::AppState;

use super::not_found_message;

pub async fn course_update(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
    body: Result<Json<CourseInput>, JsonRejection>,
) -> ApiResult<Course> {
    let id = parse_id(&id)?;
    let course = Repository::<Course>::new(&COURSES, state.pool.clone())
        .select_404(id, not_found_message(id))
        .await?;
    ensure_owner(&account, course.account_id, &format!("update course {}", course.id))?;

    let Json(input) = body?;
    input.validate_update()?;

    let updated = CourseService::new(state.pool.clone())
        .update(course.id, &input)
        .await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageCost(updated.listing_id))
        .await;

    Ok(ApiResponse::success(updated))
}
