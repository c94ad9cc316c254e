//! Application error type shared by handlers and middleware.
//!
//! Every error leaving the API is rendered as a single-field JSON body:
//!
//! ```json
//! { "reason": "identity header is empty" }
//! ```
//!
//! The reason is the `Display` output of the wrapped cause. Callers that want
//! the underlying message surfaced verbatim must not attach extra `anyhow`
//! context before converting, since `anyhow` displays the outermost context.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// The message rendered as `reason`.
    pub fn reason(&self) -> String {
        self.error.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            reason: self.reason(),
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_renders_reason() {
        let response =
            AppError::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("identity header is empty"))
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            ErrorResponse {
                reason: "identity header is empty".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_from_converts_to_internal() {
        let err: AppError = anyhow::anyhow!("some error").into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.reason, "some error");
    }

    #[test]
    fn test_reason_uses_outermost_context() {
        let err = AppError::internal(anyhow::anyhow!("root cause").context("outer"));
        assert_eq!(err.reason(), "outer");
    }
}
