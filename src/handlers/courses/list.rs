// handlers/courses/list.rs - GET /courses and GET /listings/:listing_id/courses

use axum::extract::{Path, RawQuery, State};
use serde_json::json;

use crate::database::QueryBuilder;
use crate::error::ApiError;
use crate::filter::collection::{COURSES, PARENT_LISTING};
use crate::filter::QueryParams;
use crate::handlers::parse_id;
use crate::middleware::ListResponse;
use crate::state::AppState;

pub async fn course_list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<ListResponse, ApiError> {
    let params = QueryParams::parse(query.as_deref())?;
    run(&state, params).await
}

/// Same query surface, restricted to one listing's courses
pub async fn listing_course_list(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<ListResponse, ApiError> {
    let listing_id = parse_id(&listing_id)?;
    let params = QueryParams::parse(query.as_deref())?
        .with_condition("listing_id", json!(listing_id.to_string()));
    run(&state, params).await
}

async fn run(state: &AppState, params: QueryParams) -> Result<ListResponse, ApiError> {
    let results = QueryBuilder::new(&COURSES)
        .params(&params, &state.config.filter)?
        .expand(Some(&PARENT_LISTING))
        .advanced_results(&state.pool)
        .await?;
    Ok(ListResponse(results))
}
