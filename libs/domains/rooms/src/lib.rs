//! Rooms domain
//!
//! ```text
//! handlers    HTTP endpoints, OpenAPI
//!    │
//! service     validation, uniqueness and occupancy rules
//!    │
//! repository  storage trait, in-memory and PostgreSQL implementations
//! ```
//!
//! ```rust,no_run
//! use domain_rooms::{handlers, InMemoryRoomRepository, RoomService};
//!
//! let service = RoomService::new(InMemoryRoomRepository::new());
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{RoomError, RoomResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateRoom, NewRoom, PatchStatus, Room, RoomChanges, RoomCriterion, RoomFilterResult,
    RoomPatch, RoomType,
};
pub use postgres::PgRoomRepository;
pub use repository::{InMemoryRoomRepository, RoomRepository};
pub use service::RoomService;
