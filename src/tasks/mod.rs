//! Task records: entity, wire DTOs, in-memory repository and service layer.

pub mod entity;
pub mod model;
pub mod repository;
pub mod service;

pub use entity::Task;
pub use model::{BulkDeleteRequest, TaskResponse, UpsertTaskRequest};
pub use repository::{FIRST_TASK_ID, InMemoryTaskRepository, RepositoryError, TaskRepository};
pub use service::TaskService;
