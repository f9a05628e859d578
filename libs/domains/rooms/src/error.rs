use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ClassifiedError, ErrorKind};
use database::FilterError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("room {0} not found")]
    NotFound(i32),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RoomResult<T> = Result<T, RoomError>;

impl ClassifiedError for RoomError {
    fn kind(&self) -> ErrorKind {
        match self {
            RoomError::Validation(_) => ErrorKind::Validation,
            RoomError::Conflict(_) => ErrorKind::Conflict,
            RoomError::NotFound(_) => ErrorKind::NotFound,
            RoomError::Database(_) | RoomError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<FilterError> for RoomError {
    fn from(err: FilterError) -> Self {
        RoomError::Validation(err.to_string())
    }
}

impl From<RoomError> for AppError {
    fn from(err: RoomError) -> Self {
        AppError::from_classified(&err)
    }
}

impl IntoResponse for RoomError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
