use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, OptionalJson, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use database::ColumnFilter;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::BookingResult;
use crate::models::{Booking, BookingFilterResult, BookingPatch, BookingStatus, CreateBooking};
use crate::repository::BookingRepository;
use crate::service::BookingService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_bookings,
        create_booking,
        get_booking,
        patch_booking,
        remove_booking,
        filter_bookings
    ),
    components(
        schemas(Booking, BookingStatus, CreateBooking, BookingPatch, BookingFilterResult),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Guest bookings")
    )
)]
pub struct ApiDoc;

pub fn router<R: BookingRepository + 'static>(service: BookingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route(
            "/{id}",
            get(get_booking).patch(patch_booking).delete(remove_booking),
        )
        .route("/filter", post(filter_bookings))
        .with_state(shared_service)
}

/// List every booking
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "All bookings ordered by id", body = Vec<Booking>),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_bookings<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
) -> BookingResult<Json<Vec<Booking>>> {
    let bookings = service.get_list().await?;
    Ok(Json(bookings))
}

/// Book a room for a guest
///
/// Fails when the guest or the room already has a `confirmed` or
/// `checked_in` booking.
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateBooking>,
) -> BookingResult<impl IntoResponse> {
    let booking = service.create_booking(input).await?;

    AuditEvent::new(
        "booking.create",
        Some(format!("booking:{}", booking.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "room_id": booking.room_id,
        "guest_id": booking.guest_id,
        "status": booking.status.to_string(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    IdPath(id): IdPath,
) -> BookingResult<Json<Booking>> {
    let booking = service.read_by_id(id).await?;
    Ok(Json(booking))
}

/// Change some fields of a booking
///
/// Absent fields keep their stored value. The merged booking is checked
/// with the same rules as a new one.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "Booking id")
    ),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(patch): ValidatedJson<BookingPatch>,
) -> BookingResult<Json<Booking>> {
    let patch = BookingPatch {
        id: Some(id),
        ..patch
    };

    let booking = service.patch_by_id(patch).await?;
    Ok(Json(booking))
}

/// Remove a booking
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "Booking id")
    ),
    responses(
        (status = 204, description = "Booking removed"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_booking<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> BookingResult<impl IntoResponse> {
    service.remove_booking(id).await?;

    AuditEvent::new(
        "booking.delete",
        Some(format!("booking:{id}")),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Find booking ids by column value
///
/// Dates are matched exactly and are given as RFC 3339 strings. An empty or
/// absent body lists every booking.
#[utoipa::path(
    post,
    path = "/filter",
    tag = entity::Model::TAG,
    request_body(
        content = std::collections::BTreeMap<String, serde_json::Value>,
        description = "Column name to expected value; may be empty"
    ),
    responses(
        (status = 200, description = "Matching ids per column, or all bookings", body = BookingFilterResult),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_bookings<R: BookingRepository>(
    State(service): State<Arc<BookingService<R>>>,
    OptionalJson(filter): OptionalJson<ColumnFilter>,
) -> BookingResult<Json<BookingFilterResult>> {
    let result = match filter {
        Some(filter) if !filter.is_empty() => {
            BookingFilterResult::Matches(service.get_filtered_bookings(filter).await?)
        }
        _ => BookingFilterResult::All(service.get_list().await?),
    };

    Ok(Json(result))
}
