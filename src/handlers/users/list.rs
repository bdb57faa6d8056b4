// handlers/users/list.rs - GET /users handler

use axum::extract::{RawQuery, State};

use crate::database::QueryBuilder;
use crate::error::ApiError;
use crate::filter::collection::ACCOUNTS;
use crate::filter::QueryParams;
use crate::middleware::ListResponse;
use crate::state::AppState;

/// Advanced results over accounts; password and reset columns are hidden
pub async fn user_list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<ListResponse, ApiError> {
    let params = QueryParams::parse(query.as_deref())?;

    let results = QueryBuilder::new(&ACCOUNTS)
        .params(&params, &state.config.filter)?
        .advanced_results(&state.pool)
        .await?;

    Ok(ListResponse(results))
}
