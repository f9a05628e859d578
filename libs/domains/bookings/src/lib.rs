//! Bookings domain
//!
//! A guest holds at most one active (`confirmed` or `checked_in`) booking,
//! and so does a room. The service checks both before inserting; the
//! storage layer enforces the same rule for concurrent writers.
//!
//! ```rust,no_run
//! use domain_bookings::{handlers, BookingService, InMemoryBookingRepository, PrecheckPolicy};
//!
//! let service = BookingService::new(InMemoryBookingRepository::new())
//!     .with_precheck_policy(PrecheckPolicy::FailClosed);
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{BookingError, BookingResult};
pub use handlers::ApiDoc;
pub use models::{
    Booking, BookingCriterion, BookingFields, BookingFilterResult, BookingPatch, BookingStatus,
    CreateBooking,
};
pub use policy::PrecheckPolicy;
pub use postgres::PgBookingRepository;
pub use repository::{BookingRepository, InMemoryBookingRepository};
pub use service::BookingService;
