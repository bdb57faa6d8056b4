pub mod auth;
pub mod response;

pub use auth::{authorize, protect, AuthAccount, ADMINS, PUBLISHERS, REVIEWERS};
pub use response::{ApiResponse, ApiResult, CollectionResponse, ListResponse, TokenResponse};
