use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_helpers::ValidatedJson;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::TaskResult;
use crate::models::{NewTask, Task, TaskPriority, TaskResponse, TaskStatus};
use crate::repository::TaskRepository;

/// Body of `POST /tasks`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 255, message = "title must be between 1 and 255 characters")
    )]
    #[schema(example = "Buy milk", min_length = 1, max_length = 255)]
    pub title: Option<String>,
    pub description: Option<String>,
    /// Defaults to `PENDING`
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            title: request.title.unwrap_or_default(),
            description: request.description,
            status: request.status.unwrap_or_default(),
            priority: request.priority,
            due_date: request.due_date,
        }
    }
}

pub struct CreateTaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for CreateTaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> CreateTaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(task_title = ?request.title))]
    pub async fn execute(&self, request: CreateTaskRequest) -> TaskResult<TaskResponse> {
        request.validate()?;

        let task = Task::from(NewTask::from(request));
        let created = self.repository.create(task).await?;
        Ok(created.into())
    }
}

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = TaskResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): State<CreateTaskService<R>>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> TaskResult<impl IntoResponse> {
    let task = service.execute(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}
