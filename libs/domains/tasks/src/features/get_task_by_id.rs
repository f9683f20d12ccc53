use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::IntoParams;

use super::parse_task_id;
use crate::error::{TaskError, TaskResult};
use crate::models::TaskResponse;
use crate::repository::TaskRepository;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct GetTaskByIdParams {
    /// Task ID
    pub id: String,
}

pub struct GetTaskByIdService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for GetTaskByIdService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> GetTaskByIdService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(task_id = %params.id))]
    pub async fn execute(&self, params: GetTaskByIdParams) -> TaskResult<TaskResponse> {
        let id = parse_task_id(&params.id)?;

        self.repository
            .find_by_id(id)
            .await?
            .map(TaskResponse::from)
            .ok_or(TaskError::NotFound(params.id))
    }
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "tasks",
    params(GetTaskByIdParams),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn get_task_by_id<R: TaskRepository>(
    State(service): State<GetTaskByIdService<R>>,
    Path(params): Path<GetTaskByIdParams>,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.execute(params).await?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::stored_task;
    use super::*;
    use crate::repository::MockTaskRepository;

    fn params(id: impl ToString) -> GetTaskByIdParams {
        GetTaskByIdParams { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_returns_stored_task_verbatim() {
        let task = stored_task("Write report");
        let expected = TaskResponse::from(task.clone());
        let id = task.id;

        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .withf(move |candidate| *candidate == id)
            .returning(move |_| Ok(Some(task.clone())));

        let service = GetTaskByIdService::new(Arc::new(repo));
        assert_eq!(service.execute(params(id)).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let id = uuid::Uuid::now_v7();

        let err = GetTaskByIdService::new(Arc::new(repo))
            .execute(params(id))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), format!("Task with ID {} not found", id));
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found_without_lookup() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().never();

        let err = GetTaskByIdService::new(Arc::new(repo))
            .execute(params("unknown-id"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Task with ID unknown-id not found");
    }
}
