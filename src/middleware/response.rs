use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::database::AdvancedResults;

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub set_cookie: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            set_cookie: None,
        }
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
            set_cookie: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.set_cookie = Some(cookie);
        self
    }
}

impl ApiResponse<Value> {
    /// `{success: true, data: {}}`, used by deletes and logout
    pub fn empty() -> Self {
        Self::success(json!({}))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => return serialization_failure(e),
        };

        let envelope = json!({
            "success": true,
            "data": data_value
        });

        with_cookie((status, Json(envelope)).into_response(), self.set_cookie)
    }
}

/// List envelope: `{success, count, pagination, data}`
#[derive(Debug)]
pub struct ListResponse(pub AdvancedResults);

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        let AdvancedResults { count, pagination, data } = self.0;
        let pagination = match serde_json::to_value(&pagination) {
            Ok(value) => value,
            Err(e) => return serialization_failure(e),
        };
        Json(json!({
            "success": true,
            "count": count,
            "pagination": pagination,
            "data": data
        }))
        .into_response()
    }
}

/// Unpaginated list envelope: `{success, count, data}`
#[derive(Debug)]
pub struct CollectionResponse<T: Serialize>(pub Vec<T>);

impl<T: Serialize> IntoResponse for CollectionResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.0) {
            Ok(value) => value,
            Err(e) => return serialization_failure(e),
        };
        Json(json!({
            "success": true,
            "count": self.0.len(),
            "data": data
        }))
        .into_response()
    }
}

/// Session envelope `{success, token}` plus the `token` cookie
#[derive(Debug)]
pub struct TokenResponse {
    pub token: String,
    pub cookie: String,
    pub status_code: StatusCode,
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": true, "token": self.token }));
        with_cookie((self.status_code, body).into_response(), Some(self.cookie))
    }
}

fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Invalid Set-Cookie value: {}", e),
        }
    }
    response
}

fn serialization_failure(e: serde_json::Error) -> Response {
    tracing::error!("Failed to serialize response data: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Server Error"
        })),
    )
        .into_response()
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
