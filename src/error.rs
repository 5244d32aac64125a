//! Domain error type and its conversion into JSON responses
//!
//! Every failure in the request pipeline is an [`ApiError`]. Handlers and
//! middleware return it through `Result`, and `IntoResponse` turns it into the
//! wire shape `{"message": ..., "code": ...}` with the carried status.

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

/// Application-level failure carrying a message, a symbolic code and an HTTP status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} ({status}): {message}")]
pub struct ApiError {
    pub message: String,
    pub code: String,
    pub status: StatusCode,
}

impl Default for ApiError {
    fn default() -> Self {
        Self {
            message: "Unexpected error!".to_string(),
            code: "internal_server_error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            status,
        }
    }

    pub fn url_required() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "url_required", "URL is required")
    }

    pub fn invalid_url() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_url", "Invalid URL")
    }

    pub fn invalid_api_key() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "invalid_api_key",
            "Forbidden: Invalid or missing API key",
        )
    }

    /// The extraction engine failed or produced no usable media URL
    ///
    /// `message` is passed through to the client untouched.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "video_url_extraction_error", message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "Method not allowed",
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "message": self.message,
                "code": self.code,
            })),
        )
            .into_response()
    }
}

/// Query string extractor whose rejection is a `bad_request` [`ApiError`]
///
/// Behaves like [`axum::extract::Query`] but keeps malformed query strings on
/// the same JSON error channel as every other failure.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("Failed to parse JSON"))
    }

    #[test]
    fn default_fields() {
        let error = ApiError::default();
        assert_eq!(error.message, "Unexpected error!");
        assert_eq!(error.code, "internal_server_error");
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn partial_construction_keeps_remaining_defaults() {
        let error = ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "boom".to_string(),
            ..Default::default()
        };
        assert_eq!(error.code, "internal_server_error");
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn response_carries_status_message_and_code() {
        let (status, body) = body_json(ApiError::invalid_api_key()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({
                "message": "Forbidden: Invalid or missing API key",
                "code": "invalid_api_key"
            })
        );
    }

    #[tokio::test]
    async fn extraction_message_is_passed_through() {
        let (status, body) = body_json(ApiError::extraction("ERROR: Unsupported URL")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ERROR: Unsupported URL");
        assert_eq!(body["code"], "video_url_extraction_error");
    }
}
