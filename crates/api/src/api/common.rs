// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::extract::{rejection::JsonRejection, FromRequest};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hoops_core::ActionError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Action error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub ActionError);

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ActionError::Validation(_) => StatusCode::BAD_REQUEST,
            ActionError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ActionError::NotFound(_) | ActionError::NotSignedUp => StatusCode::NOT_FOUND,
            ActionError::AlreadyBackedOut | ActionError::NoActiveRegistration => {
                StatusCode::CONFLICT
            }
            ActionError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!(status = %status, "Request rejected: {}", self.0);
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body extractor whose rejections use the `{error}` body
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ActionError::validation(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(ActionError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(ActionError::unauthorized("no")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError(ActionError::event_not_found()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError(ActionError::NotSignedUp).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(ActionError::AlreadyBackedOut).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(ActionError::failed("Failed to back out")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        use axum::body::Body;
        use axum::http::Request;

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{\"location\": "))
            .unwrap();

        let err = ApiJson::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err.0, ActionError::Validation(_)));
    }

    #[test]
    fn test_list_response_shape() {
        let json = serde_json::to_value(ListResponse::new(vec![1, 2])).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
