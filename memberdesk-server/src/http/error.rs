//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": ...}` JSON bodies with the matching
//! status code. Messages from the store are passed through to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::db::StoreError;
use crate::models::ValidationErrors;

/// Body of every 404 from the member routes
pub const MEMBER_NOT_FOUND: &str = "Member not found";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request body is not JSON (400)
    InvalidBody(serde_json::Error),

    /// Schema validation failed (400)
    Validation(ValidationErrors),

    /// Store uniqueness rule violated (400)
    Duplicate(String),

    /// No member with the requested id (404)
    NotFound,

    /// Store unreachable or failed (500, logged)
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::Validation(_) | Self::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::InvalidBody(e) => json!({ "error": format!("invalid JSON body: {}", e) }),
            Self::Validation(errors) => json!({ "error": errors }),
            Self::Duplicate(message) => json!({ "error": message }),
            Self::NotFound => json!({ "error": MEMBER_NOT_FOUND }),
            Self::Store(e) => json!({ "error": e.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(e) => tracing::error!(error = %e, "Store error"),
            Self::Duplicate(message) => tracing::warn!(%message, "Duplicate submission"),
            Self::Validation(errors) => {
                tracing::debug!(count = errors.len(), "Submission failed validation")
            }
            _ => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidBody(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(message) => Self::Duplicate(message),
            StoreError::NotFound(_) => Self::NotFound,
            _ => Self::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldErrorKind;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_with_list() {
        let err = ApiError::Validation(ValidationErrors::single("age", FieldErrorKind::Missing));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"][0]["field"], "age");
        assert_eq!(body["error"][0]["message"], "required field missing");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::from(StoreError::NotFound(999)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Member not found" })
        );
    }

    #[tokio::test]
    async fn duplicate_is_400_with_message() {
        let err = ApiError::from(StoreError::Duplicate("email already registered".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "email already registered");
    }

    #[tokio::test]
    async fn unavailable_is_500_with_message() {
        let err = ApiError::from(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("storage unavailable"));
    }

    #[tokio::test]
    async fn bad_json_is_400() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let response = ApiError::from(parse_err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON body"));
    }
}
