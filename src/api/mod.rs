//! HTTP surface for the task service.
//!
//! Routes live under `/api/v1/tasks`. Item routes run the path parameter
//! extraction middleware before their handlers.

pub mod error;
pub mod middleware;
mod server;
pub mod tasks;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{PathParam, Scope, UNSIGNED_INT_PATTERN, extract_path_param};
pub use server::{
    AppState, ServerHandle, TASKS_PATH, build_router, start_server, with_service_layers,
};
