// handlers/mod.rs - Route handlers, one module per resource
//
// Public reads and authenticated writes share a resource module; the router
// decides which methods sit behind `protect` and `authorize`.

use uuid::Uuid;

use crate::error::ApiError;

pub mod auth;
pub mod courses;
pub mod health;
pub mod listings;
pub mod reviews;
pub mod users;

/// Path ids that are not UUIDs are reported as missing resources
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::resource_not_found())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_id("5d713995b721c3bb38c1f5d0").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Resource not found");

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
