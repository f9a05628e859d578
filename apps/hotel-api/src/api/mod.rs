use axum::Router;

pub mod bookings;
pub mod health;
pub mod rooms;

/// API routes without the `/api` prefix, which `create_router` adds.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest(domain_rooms::entity::Model::URL, rooms::router(state))
        .nest(domain_bookings::entity::Model::URL, bookings::router(state))
}

/// `/ready`, checking the database. Merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
