// handlers/listings/list.rs - GET /listings handler

use axum::extract::{RawQuery, State};

use crate::database::QueryBuilder;
use crate::error::ApiError;
use crate::filter::collection::{LISTINGS, LISTING_COURSES};
use crate::filter::QueryParams;
use crate::middleware::ListResponse;
use crate::state::AppState;

/// Advanced results over listings, each with its courses inlined
pub async fn listing_list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<ListResponse, ApiError> {
    let params = QueryParams::parse(query.as_deref())?;

    let results = QueryBuilder::new(&LISTINGS)
        .params(&params, &state.config.filter)?
        .expand(Some(&LISTING_COURSES))
        .advanced_results(&state.pool)
        .await?;

    Ok(ListResponse(results))
}
