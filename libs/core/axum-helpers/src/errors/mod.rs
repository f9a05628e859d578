pub mod codes;
pub mod handlers;
pub mod kind;
pub mod responses;

pub use codes::ErrorCode;
pub use kind::{ClassifiedError, ErrorKind};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// { "code": 1008, "error": "CONFLICT", "message": "room number 101 already exists" }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logs and monitoring
    pub code: i32,
    /// Machine-readable identifier
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Structured extra information, e.g. per-field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error type returned by handlers and converted into an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Map a domain error onto the HTTP taxonomy by its kind, keeping its message.
    pub fn from_classified<E: ClassifiedError>(err: &E) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => AppError::BadRequest(message),
            ErrorKind::Conflict => AppError::Conflict(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Internal => AppError::InternalServerError(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::MalformedJson(_)
            | AppError::ValidationError(_)
            | AppError::InvalidId(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_parts(self) -> (ErrorCode, String, Option<serde_json::Value>) {
        match self {
            AppError::JsonExtractorRejection(e) => (ErrorCode::InvalidJson, e.body_text(), None),
            AppError::MalformedJson(msg) => (ErrorCode::InvalidJson, msg, None),
            AppError::ValidationError(e) => (
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message().to_string(),
                serde_json::to_value(&e).ok(),
            ),
            AppError::InvalidId(raw) => (ErrorCode::InvalidId, format!("invalid id: {raw}"), None),
            AppError::BadRequest(msg) => (ErrorCode::ValidationError, msg, None),
            AppError::NotFound(msg) => (ErrorCode::NotFound, msg, None),
            AppError::Conflict(msg) => (ErrorCode::Conflict, msg, None),
            AppError::InternalServerError(msg) => (ErrorCode::InternalError, msg, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = self.into_parts();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), %status, "{message}");
        } else {
            tracing::info!(error_code = code.code(), %status, "{message}");
        }

        error_response(status, code, message, details)
    }
}

/// Build an error response outside of [`AppError`], e.g. in fallbacks.
pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> Response {
    let body = Json(ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message: message.into(),
        details,
    });

    (status, body).into_response()
}
