//! # Axum Helpers
//!
//! Shared HTTP plumbing for the hotel services.
//!
//! - **[`server`]**: router assembly with API docs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: error taxonomy and the JSON error body
//! - **[`extractors`]**: integer id paths, validated and optional JSON bodies
//! - **[`audit`]**: audit events for state-changing requests

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ClassifiedError, ErrorCode, ErrorKind, ErrorResponse};

pub use extractors::{IdPath, OptionalJson, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
