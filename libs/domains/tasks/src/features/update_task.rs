use axum::{
    Json,
    extract::{Path, State},
};
use axum_helpers::ValidatedJson;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::parse_task_id;
use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskPriority, TaskResponse, TaskStatus};
use crate::repository::TaskRepository;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct UpdateTaskParams {
    /// Task ID
    pub id: String,
}

/// Body of `PUT /tasks/{id}`.
///
/// `title` and `status` are always required. For the optional fields an
/// absent key keeps the stored value and an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 255, message = "title must be between 1 and 255 characters")
    )]
    #[schema(example = "Buy milk", min_length = 1, max_length = 255)]
    pub title: Option<String>,
    #[validate(required(message = "status is required"))]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<TaskPriority>)]
    pub priority: Option<Option<TaskPriority>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Distinguishes `"key": null` (Some(None)) from a missing key (None, via `default`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateTaskRequest {
    /// Overwrite the provided fields of a stored task.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.touch();
    }
}

pub struct UpdateTaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for UpdateTaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> UpdateTaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(task_id = %params.id))]
    pub async fn execute(
        &self,
        params: UpdateTaskParams,
        request: UpdateTaskRequest,
    ) -> TaskResult<TaskResponse> {
        request.validate()?;
        let id = parse_task_id(&params.id)?;

        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(params.id.clone()))?;

        request.apply_to(&mut task);

        self.repository
            .update(task)
            .await?
            .map(TaskResponse::from)
            .ok_or(TaskError::NotFound(params.id))
    }
}

/// Update a task
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "tasks",
    params(UpdateTaskParams),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated successfully", body = TaskResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestValidationResponse),
        (status = 404, response = axum_helpers::errors::responses::NotFoundResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): State<UpdateTaskService<R>>,
    Path(params): Path<UpdateTaskParams>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.execute(params, request).await?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::stored_task;
    use super::*;
    use crate::repository::MockTaskRepository;
    use chrono::Duration;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> UpdateTaskRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_absent_keeps_and_null_clears() {
        let mut task = stored_task("Buy milk");
        task.description = Some("2 litres".to_string());
        task.priority = Some(TaskPriority::High);

        parse(json!({"title": "Buy oat milk", "status": "IN_PROGRESS", "priority": null}))
            .apply_to(&mut task);

        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.description.as_deref(), Some("2 litres"));
        assert_eq!(task.priority, None);
    }

    #[test]
    fn test_status_is_required() {
        let errors = parse(json!({"title": "x"})).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("status"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_value::<UpdateTaskRequest>(
            json!({"title": "x", "status": "PENDING", "completed": true}),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let mut task = stored_task("Buy milk");
        task.created_at -= Duration::hours(1);
        task.updated_at = task.created_at;
        let original = task.clone();

        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(task.clone())));
        repo.expect_update().times(1).returning(|task| Ok(Some(task)));

        let response = UpdateTaskService::new(Arc::new(repo))
            .execute(
                UpdateTaskParams {
                    id: original.id.to_string(),
                },
                parse(json!({"title": "Buy milk", "status": "COMPLETED"})),
            )
            .await
            .unwrap();

        assert_eq!(response.status, TaskStatus::Completed);
        assert_eq!(response.created_at, original.created_at);
        assert!(response.updated_at > original.created_at);
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();
        let id = uuid::Uuid::now_v7().to_string();

        let err = UpdateTaskService::new(Arc::new(repo))
            .execute(
                UpdateTaskParams { id: id.clone() },
                parse(json!({"title": "x", "status": "PENDING"})),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), format!("Task with ID {} not found", id));
    }

    #[tokio::test]
    async fn test_invalid_body_never_touches_storage() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().never();

        let result = UpdateTaskService::new(Arc::new(repo))
            .execute(
                UpdateTaskParams {
                    id: uuid::Uuid::now_v7().to_string(),
                },
                parse(json!({"title": "x"})),
            )
            .await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
    }
}
