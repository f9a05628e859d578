//! Handler tests for the rooms domain
//!
//! Requests go through the domain router only, backed by the in-memory
//! repository, so these cover extraction, status codes and JSON shapes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_rooms::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app_with(repo: InMemoryRoomRepository) -> Router {
    handlers::router(RoomService::new(repo))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn room_body(number: i32) -> Value {
    json!({
        "number": number,
        "room_count": 2,
        "is_occupied": false,
        "floor": 1,
        "sleeping_places": 2,
        "room_type": "Deluxe",
        "need_cleaning": false
    })
}

async fn seed(repo: &InMemoryRoomRepository, number: i32, is_occupied: bool) -> Room {
    repo.create(NewRoom {
        number,
        room_count: 1,
        is_occupied,
        floor: 1,
        sleeping_places: 2,
        room_type: RoomType::Standard,
        need_cleaning: false,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_add_room_returns_201() {
    let app = app_with(InMemoryRoomRepository::new());

    let response = app
        .oneshot(json_request("POST", "/", room_body(101)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let room: Room = json_body(response.into_body()).await;
    assert_eq!(room.id, 1);
    assert_eq!(room.number, 101);
    assert_eq!(room.room_type, RoomType::Deluxe);
}

#[tokio::test]
async fn test_add_duplicate_room_returns_409() {
    let repo = InMemoryRoomRepository::new();
    seed(&repo, 101, false).await;

    let response = app_with(repo)
        .oneshot(json_request("POST", "/", room_body(101)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_add_room_with_unknown_type_returns_400() {
    let mut body = room_body(101);
    body["room_type"] = json!("Penthouse");

    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_add_room_with_malformed_json_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"number\": "))
        .unwrap();

    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_empty_returns_409() {
    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "database is clear");
}

#[tokio::test]
async fn test_list_returns_rooms_in_id_order() {
    let repo = InMemoryRoomRepository::new();
    seed(&repo, 201, false).await;
    seed(&repo, 101, false).await;

    let response = app_with(repo)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rooms: Vec<Room> = json_body(response.into_body()).await;
    let ids: Vec<i32> = rooms.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_patch_only_changes_supplied_fields() {
    let repo = InMemoryRoomRepository::new();
    let room = seed(&repo, 101, false).await;

    let response = app_with(repo.clone())
        .oneshot(json_request("PATCH", &format!("/{}", room.id), json!({"floor": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rooms = repo.list().await.unwrap();
    assert_eq!(rooms[0], Room { floor: 2, ..room });
}

#[tokio::test]
async fn test_patch_cleaning_on_occupied_room_returns_400() {
    let repo = InMemoryRoomRepository::new();
    let room = seed(&repo, 101, true).await;

    let response = app_with(repo.clone())
        .oneshot(json_request(
            "PATCH",
            &format!("/{}", room.id),
            json!({"need_cleaning": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "cannot set need_cleaning while room is occupied");

    let stored = &repo.list().await.unwrap()[0];
    assert!(stored.is_occupied);
    assert!(!stored.need_cleaning);
}

#[tokio::test]
async fn test_patch_missing_room_returns_404() {
    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(json_request("PATCH", "/9", json!({"floor": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_with_non_numeric_id_returns_400() {
    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(json_request("PATCH", "/abc", json!({"floor": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_delete_occupied_room_returns_400() {
    let repo = InMemoryRoomRepository::new();
    let room = seed(&repo, 101, true).await;

    let response = app_with(repo.clone())
        .oneshot(
            Request::delete(format!("/{}", room.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "room is occupied");
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_free_room_returns_204() {
    let repo = InMemoryRoomRepository::new();
    let room = seed(&repo, 101, false).await;

    let response = app_with(repo.clone())
        .oneshot(
            Request::delete(format!("/{}", room.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_by_column() {
    let repo = InMemoryRoomRepository::new();
    seed(&repo, 101, false).await;
    let busy = seed(&repo, 102, true).await;

    let response = app_with(repo)
        .oneshot(json_request(
            "POST",
            "/filter",
            json!({"is_occupied": true, "room_type": "Suite"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({"is_occupied": [busy.id], "room_type": []}));
}

#[tokio::test]
async fn test_filter_without_body_lists_all() {
    let repo = InMemoryRoomRepository::new();
    seed(&repo, 101, false).await;

    let response = app_with(repo)
        .oneshot(Request::post("/filter").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rooms: Vec<Room> = json_body(response.into_body()).await;
    assert_eq!(rooms.len(), 1);
}

#[tokio::test]
async fn test_filter_unknown_column_returns_400() {
    let response = app_with(InMemoryRoomRepository::new())
        .oneshot(json_request("POST", "/filter", json!({"price": 10})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
