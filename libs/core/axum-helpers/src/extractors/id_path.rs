//! Integer id path parameter.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extracts a storage-assigned integer id from a `/{id}` segment.
///
/// Non-numeric segments are rejected with `400 INVALID_ID`. Range checks
/// (`id > 0`) are left to the services.
///
/// ```ignore
/// async fn read(IdPath(id): IdPath) -> String {
///     format!("booking {id}")
/// }
///
/// let app = Router::new().route("/{id}", get(read));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.trim()
            .parse::<i32>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(raw).into_response())
    }
}
