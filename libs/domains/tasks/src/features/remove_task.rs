use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::parse_task_id;
use crate::error::{TaskError, TaskResult};
use crate::repository::TaskRepository;

pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully";

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct RemoveTaskParams {
    /// Task ID
    pub id: String,
}

/// Confirmation returned by `DELETE /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RemoveTaskResponse {
    #[schema(example = "Task deleted successfully")]
    pub message: String,
    pub id: Uuid,
}

pub struct RemoveTaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for RemoveTaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> RemoveTaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Hard delete. Deleting an id with no stored row is a not-found error.
    #[instrument(skip(self), fields(task_id = %params.id))]
    pub async fn execute(&self, params: RemoveTaskParams) -> TaskResult<RemoveTaskResponse> {
        let id = parse_task_id(&params.id)?;

        if !self.repository.delete(id).await? {
            return Err(TaskError::NotFound(params.id));
        }

        Ok(RemoveTaskResponse {
            message: TASK_DELETED_MESSAGE.to_string(),
            id,
        })
    }
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "tasks",
    params(RemoveTaskParams),
    responses(
        (status = 200, description = "Task deleted successfully", body = RemoveTaskResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn remove_task<R: TaskRepository>(
    State(service): State<RemoveTaskService<R>>,
    Path(params): Path<RemoveTaskParams>,
) -> TaskResult<Json<RemoveTaskResponse>> {
    let confirmation = service.execute(params).await?;
    Ok(Json(confirmation))
}
