//! Tasks Domain
//!
//! Entity, DTOs, per-operation services and HTTP handlers for tasks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ TasksModule  │  ← Router + OpenAPI, one service per feature
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Features   │  ← create / get-by-id / list / update / remove
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  Repository  │  ← Data access (trait + Postgres / in-memory)
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, TasksModule};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let router = TasksModule::new(PgTaskRepository::new(db)).router();
//! let app = axum::Router::new().nest("/tasks", router);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod features;
pub mod models;
pub mod module;
pub mod postgres;
pub mod repository;

pub use error::{TaskError, TaskResult};
pub use features::{
    create_task::{CreateTaskRequest, CreateTaskService},
    get_task_by_id::{GetTaskByIdParams, GetTaskByIdService},
    get_tasks::{GetTasksQuery, GetTasksResponse, GetTasksService, PaginationMeta},
    remove_task::{RemoveTaskParams, RemoveTaskResponse, RemoveTaskService},
    update_task::{UpdateTaskParams, UpdateTaskRequest, UpdateTaskService},
};
pub use models::{NewTask, Task, TaskPage, TaskPriority, TaskQuery, TaskResponse, TaskStatus};
pub use module::{TasksApiDoc, TasksModule};
pub use postgres::PgTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
