//! Error type shared by every handler.
//!
//! Only a missing generation title is reported as a client error; everything
//! else, not-found and missing fields included, surfaces as a 500.

use crate::completion::GenerationError;
use crate::db::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No Blogs found")]
    NoBlogs,

    #[error("No Blog Found")]
    NotFound,

    #[error("No Blogs Found")]
    NothingToDelete,

    #[error("Please fill in all the required fields")]
    MissingFields,

    #[error("Title is required")]
    MissingTitle,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to parse generated content: {message}")]
    MalformedCompletion { message: String, raw: String },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingTitle => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match self {
            AppError::MalformedCompletion { raw, .. } => json!({
                "error": self.to_string(),
                "raw": raw,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn only_missing_title_is_a_client_error() {
        assert_eq!(AppError::MissingTitle.status_code(), StatusCode::BAD_REQUEST);
        for err in [
            AppError::NoBlogs,
            AppError::NotFound,
            AppError::NothingToDelete,
            AppError::MissingFields,
            AppError::Store(StoreError::InvalidId("x".into())),
            AppError::Generation(GenerationError::EmptyCompletion),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[actix_web::test]
    async fn body_carries_the_message() {
        let body = body_of(AppError::MissingFields).await;
        assert_eq!(body, json!({ "error": "Please fill in all the required fields" }));
    }

    #[actix_web::test]
    async fn malformed_completion_includes_raw_text() {
        let body = body_of(AppError::MalformedCompletion {
            message: "expected value at line 1 column 1".into(),
            raw: "Sure! Here is your post".into(),
        })
        .await;
        assert_eq!(body["raw"], "Sure! Here is your post");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse generated content"));
    }
}
