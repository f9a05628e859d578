use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ClassifiedError, ErrorKind};
use database::FilterError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("booking {0} not found")]
    NotFound(i32),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// Storage failure whose details are not passed on to the caller.
    #[error("{0}")]
    Internal(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl ClassifiedError for BookingError {
    fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::Conflict(_) => ErrorKind::Conflict,
            BookingError::NotFound(_) => ErrorKind::NotFound,
            BookingError::Database(_) | BookingError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<FilterError> for BookingError {
    fn from(err: FilterError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::from_classified(&err)
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
