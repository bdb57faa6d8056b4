// handlers/courses/delete.rs - DELETE /courses/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::database::models::Course;
use crate::database::Repository;
use crate::filter::collection::COURSES;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::{AggregateCommand, CourseService};
use crate::state::AppState;

use super::not_found_message;

/// Remove a course and recompute the parent's average cost over what remains
pub async fn course_delete(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let course = Repository::<Course>::new(&COURSES, state.pool.clone())
        .select_404(id, not_found_message(id))
        .await?;
    ensure_owner(&account, course.account_id, &format!("delete course {}", course.id))?;

    CourseService::new(state.pool.clone()).delete(course.id).await?;

    state
        .aggregates()
        .dispatch(AggregateCommand::RecomputeAverageCost(course.listing_id))
        .await;

    Ok(ApiResponse::empty())
}
