// handlers/listings/show.rs - GET /listings/:id handler

use axum::extract::{Path, State};
use serde_json::Value;

use crate::database::QueryBuilder;
use crate::error::ApiError;
use crate::filter::collection::LISTINGS;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::not_found_message;

pub async fn listing_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;

    let listing = QueryBuilder::new(&LISTINGS)
        .find_by_id(id, &state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(not_found_message(id)))?;

    Ok(ApiResponse::success(listing))
}
