//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Stable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchAuthor = 4,
    NoSuchBook = 5,
    BadValue = 18,
    NoSuchData = 20,
    AuthorHasBooks = 21,
    IdMismatch = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Author {0} not found")]
    AuthorNotFound(i64),

    #[error("Book {0} not found")]
    BookNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Path id {path} does not match body id {body:?}")]
    IdMismatch { path: i64, body: Option<i64> },

    #[error("Author {0} still has books")]
    AuthorHasBooks(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::AuthorNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchAuthor, self.to_string()),
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::IdMismatch { .. } => (StatusCode::BAD_REQUEST, ErrorCode::IdMismatch, self.to_string()),
            AppError::AuthorHasBooks(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::AuthorHasBooks, self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::Failure, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases = [
            (AppError::AuthorNotFound(1), StatusCode::NOT_FOUND),
            (AppError::BookNotFound(1), StatusCode::NOT_FOUND),
            (AppError::NotFound("/nowhere".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::IdMismatch { path: 1, body: Some(2) }, StatusCode::BAD_REQUEST),
            (AppError::AuthorHasBooks(1), StatusCode::BAD_REQUEST),
            (AppError::Unavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let (_, code, message) = AppError::Internal("secret path".into()).parts();
        assert_eq!(code, ErrorCode::Failure);
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn validation_errors_keep_their_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "full_name",
            ValidationError::new("blank").with_message("Full name must not be blank".into()),
        );
        match AppError::from(errors) {
            AppError::Validation(msg) => assert_eq!(msg, "Full name must not be blank"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
