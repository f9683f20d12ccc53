use axum::{Json, extract::State};
use axum_helpers::ValidatedQuery;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::TaskResult;
use crate::models::{TaskPriority, TaskQuery, TaskResponse, TaskStatus};
use crate::repository::TaskRepository;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Highest page whose offset still fits a signed 64-bit `OFFSET`
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Query string of `GET /tasks`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct GetTasksQuery {
    /// 1-based page number (default 1)
    #[validate(range(min = 1, max = MAX_PAGE, message = "page is out of range"))]
    #[param(minimum = 1, example = 1)]
    pub page: Option<u64>,
    /// Page size (default 10, max 100)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<u64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring matched against title and description
    #[validate(length(max = 255, message = "search must be at most 255 characters"))]
    pub search: Option<String>,
}

impl From<GetTasksQuery> for TaskQuery {
    fn from(query: GetTasksQuery) -> Self {
        Self {
            page: query.page.unwrap_or(DEFAULT_PAGE),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT),
            status: query.status,
            priority: query.priority,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Envelope returned by `GET /tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GetTasksResponse {
    pub data: Vec<TaskResponse>,
    pub meta: PaginationMeta,
}

pub struct GetTasksService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for GetTasksService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> GetTasksService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, query: GetTasksQuery) -> TaskResult<GetTasksResponse> {
        query.validate()?;
        let query = TaskQuery::from(query);
        let (page, limit) = (query.page, query.limit);

        let result = self.repository.find_page(query).await?;

        Ok(GetTasksResponse {
            data: result.tasks.into_iter().map(TaskResponse::from).collect(),
            meta: PaginationMeta::new(page, limit, result.total),
        })
    }
}

/// List tasks with filters and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "tasks",
    params(GetTasksQuery),
    responses(
        (status = 200, description = "One page of tasks", body = GetTasksResponse),
        (status = 400, response = axum_helpers::errors::responses::BadRequestQueryResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn get_tasks<R: TaskRepository>(
    State(service): State<GetTasksService<R>>,
    ValidatedQuery(query): ValidatedQuery<GetTasksQuery>,
) -> TaskResult<Json<GetTasksResponse>> {
    let page = service.execute(query).await?;
    Ok(Json(page))
}
