use axum::Router;
use domain_rooms::{PgRoomRepository, RoomService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgRoomRepository::new(state.db.clone());
    let service = RoomService::new(repository);
    handlers::router(service)
}
