// handlers/listings/radius.rs - GET /listings/radius/:zipcode/:distance handler

use axum::extract::{Path, State};

use crate::database::models::Listing;
use crate::error::ApiError;
use crate::middleware::CollectionResponse;
use crate::services::{Geocoder, ListingService};
use crate::state::AppState;

/// Listings within `distance` miles of the geocoded zipcode
pub async fn listing_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> Result<CollectionResponse<Listing>, ApiError> {
    let distance = parse_distance(&distance)?;
    let radians = distance / state.config.geocoder.earth_radius;

    let center = state.geocoder.geocode(&zipcode).await?;
    let listings = ListingService::new(state.pool.clone())
        .within_radius(center.longitude(), center.latitude(), radians)
        .await?;

    tracing::debug!(%zipcode, distance, found = listings.len(), "radius search");
    Ok(CollectionResponse(listings))
}

fn parse_distance(raw: &str) -> Result<f64, ApiError> {
    match raw.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => Ok(d),
        _ => Err(ApiError::bad_request("Please provide a valid distance")),
    }
}
