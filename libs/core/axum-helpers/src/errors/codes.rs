//! Error codes carried in every error body.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer
//! for logs and dashboards, and a fallback message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::Conflict.as_str(), "CONFLICT");
//! assert_eq!(ErrorCode::Conflict.code(), 1008);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 1000-1999: caller errors
    /// A domain rule rejected the request
    ValidationError,
    /// Path id is not a valid integer
    InvalidId,
    /// Body could not be read as JSON of the expected shape
    InvalidJson,
    NotFound,
    /// Request clashes with stored state
    Conflict,
    RouteNotFound,
    MethodNotAllowed,

    // 2000-2999: server errors
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::Conflict => 1008,
            Self::RouteNotFound => 1012,
            Self::MethodNotAllowed => 1013,

            Self::InternalError => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::InvalidJson => "Invalid JSON body",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Request conflicts with the current state",
            Self::RouteNotFound => "The requested route does not exist",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "An internal server error occurred",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.code() >= 2000
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
