use axum::Router;
use domain_bookings::{BookingService, PgBookingRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgBookingRepository::new(state.db.clone());
    let service =
        BookingService::new(repository).with_precheck_policy(state.config.precheck_policy);
    handlers::router(service)
}
