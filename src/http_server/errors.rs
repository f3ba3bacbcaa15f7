//! # API Errors
//!
//! Error types for the HTTP handlers. Validation problems become 4xx
//! responses; store failures pass through as 5xx.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::table::TableError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Required field absent, empty, or not coercible to its type
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Body is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Upload body is not readable multipart
    #[error("Invalid upload: {0}")]
    Multipart(String),

    /// Upload carried no `file` field
    #[error("Missing required parameter: file")]
    MissingFile,

    /// Upload larger than the configured limit
    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    /// Keyed lookup matched nothing
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error(transparent)]
    Table(#[from] TableError),
}

impl ApiError {
    /// Required field absent or empty
    pub fn missing(field: &str) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: format!("Missing required parameter: {}", field),
        }
    }

    /// Field present but of the wrong type
    pub fn invalid(field: &str, expected: &str) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: format!("Invalid value for {}: expected {}", field, expected),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Table(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let field = match &err {
            ApiError::Validation { field, .. } => Some(field.clone()),
            ApiError::MissingFile => Some("file".to_string()),
            _ => None,
        };
        Self {
            code: err.status_code().as_u16(),
            message: err.to_string(),
            field,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Table(table_err) = &self {
            let message = table_err.to_string();
            log_event_with_fields(
                Event::TableError,
                &[("kind", table_err.kind()), ("message", message.as_str())],
            );
        }
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
