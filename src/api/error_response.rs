//! HTTP error response handling for the API
//!
//! Converts domain errors into HTTP responses with a status code, a flat
//! `{"error", "code", "details"}` JSON body and, for capacity rejections, a
//! `Retry-After` header.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after = self.retry_after_secs();

        let api_error: ApiError = self.into();
        let mut response = (status_code, Json(api_error)).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Implement IntoResponse for ApiError for explicit error responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Errors normally go through Error::into_response, which knows the status
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation("body", format!("invalid JSON request body: {}", rejection.body_text()))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use std::time::Duration;

    async fn body_of(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_with_flat_body() {
        let response = Error::validation("query", "query must not be empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let api_error = body_of(response).await;
        assert_eq!(api_error.error, "query must not be empty");
        assert_eq!(api_error.code, "validation_error");
    }

    #[tokio::test]
    async fn capacity_exceeded_is_503_with_retry_after() {
        let response =
            Error::Worker(WorkerError::CapacityExceeded { limit: 4 }).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "5");
        assert_eq!(body_of(response).await.code, "capacity_exceeded");
    }

    #[tokio::test]
    async fn timeout_is_500_without_retry_after() {
        let response = Error::Worker(WorkerError::TimedOut {
            timeout: Duration::from_secs(120),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());

        let api_error = body_of(response).await;
        assert_eq!(api_error.code, "worker_timeout");
        assert_eq!(api_error.details.unwrap()["timeout_seconds"], 120.0);
    }

    #[tokio::test]
    async fn direct_api_error_defaults_to_500() {
        let response = ApiError::internal("unexpected").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
