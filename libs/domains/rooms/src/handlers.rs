use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
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
use crate::error::RoomResult;
use crate::models::{CreateRoom, PatchStatus, Room, RoomFilterResult, RoomPatch, RoomType};
use crate::repository::RoomRepository;
use crate::service::RoomService;

#[derive(OpenApi)]
#[openapi(
    paths(list_rooms, add_room, patch_room, remove_room, filter_rooms),
    components(
        schemas(Room, RoomType, CreateRoom, RoomPatch, PatchStatus, RoomFilterResult),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Hotel rooms")
    )
)]
pub struct ApiDoc;

pub fn router<R: RoomRepository + 'static>(service: RoomService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_rooms).post(add_room))
        .route("/{id}", patch(patch_room).delete(remove_room))
        .route("/filter", post(filter_rooms))
        .with_state(shared_service)
}

/// List every room
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "All rooms ordered by id", body = Vec<Room>),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_rooms<R: RoomRepository>(
    State(service): State<Arc<RoomService<R>>>,
) -> RoomResult<Json<Vec<Room>>> {
    let rooms = service.get_list().await?;
    Ok(Json(rooms))
}

/// Add a room
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_room<R: RoomRepository>(
    State(service): State<Arc<RoomService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateRoom>,
) -> RoomResult<impl IntoResponse> {
    let room = service.add_room(input).await?;

    AuditEvent::new(
        "room.create",
        Some(format!("room:{}", room.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "number": room.number,
        "room_type": room.room_type.to_string(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(room)))
}

/// Change some fields of a room
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "Room id")
    ),
    request_body = RoomPatch,
    responses(
        (status = 200, description = "Room updated", body = PatchStatus),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_room<R: RoomRepository>(
    State(service): State<Arc<RoomService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(patch): ValidatedJson<RoomPatch>,
) -> RoomResult<Json<PatchStatus>> {
    service.patch_room(id, patch).await?;
    Ok(Json(PatchStatus {
        status: "room updated".to_string(),
    }))
}

/// Remove a free room
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "Room id")
    ),
    responses(
        (status = 204, description = "Room removed"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_room<R: RoomRepository>(
    State(service): State<Arc<RoomService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> RoomResult<impl IntoResponse> {
    service.remove_room(id).await?;

    AuditEvent::new("room.delete", Some(format!("room:{id}")), AuditOutcome::Success)
        .with_ip(extract_ip_from_headers(&headers))
        .with_user_agent(extract_user_agent(&headers))
        .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Find room ids by column value
///
/// Each key is matched on its own, so `{"floor": 2, "is_occupied": true}`
/// answers with one id list per column. An empty or absent body lists every
/// room instead.
#[utoipa::path(
    post,
    path = "/filter",
    tag = entity::Model::TAG,
    request_body(
        content = std::collections::BTreeMap<String, serde_json::Value>,
        description = "Column name to expected value; may be empty"
    ),
    responses(
        (status = 200, description = "Matching ids per column, or all rooms", body = RoomFilterResult),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_rooms<R: RoomRepository>(
    State(service): State<Arc<RoomService<R>>>,
    OptionalJson(filter): OptionalJson<ColumnFilter>,
) -> RoomResult<Json<RoomFilterResult>> {
    let result = match filter {
        Some(filter) if !filter.is_empty() => {
            RoomFilterResult::Matches(service.get_filtered_rooms(filter).await?)
        }
        _ => RoomFilterResult::All(service.get_list().await?),
    };

    Ok(Json(result))
}
