use axum::{Router, extract::FromRef, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::features::{
    create_task::{self, CreateTaskRequest, CreateTaskService},
    get_task_by_id::{self, GetTaskByIdService},
    get_tasks::{self, GetTasksResponse, GetTasksService, PaginationMeta},
    remove_task::{self, RemoveTaskResponse, RemoveTaskService},
    update_task::{self, UpdateTaskRequest, UpdateTaskService},
};
use crate::models::{TaskPriority, TaskResponse, TaskStatus};
use crate::repository::TaskRepository;

/// OpenAPI documentation for the Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        get_tasks::get_tasks,
        get_task_by_id::get_task_by_id,
        create_task::create_task,
        update_task::update_task,
        remove_task::remove_task,
    ),
    components(schemas(
        TaskResponse,
        TaskStatus,
        TaskPriority,
        CreateTaskRequest,
        UpdateTaskRequest,
        GetTasksResponse,
        PaginationMeta,
        RemoveTaskResponse,
    )),
    tags((name = "tasks", description = "Task management"))
)]
pub struct TasksApiDoc;

/// Wires one repository into every task feature.
///
/// Handlers extract only the service they need through `FromRef`.
pub struct TasksModule<R: TaskRepository> {
    pub create_task: CreateTaskService<R>,
    pub get_task_by_id: GetTaskByIdService<R>,
    pub get_tasks: GetTasksService<R>,
    pub remove_task: RemoveTaskService<R>,
    pub update_task: UpdateTaskService<R>,
}

impl<R: TaskRepository> Clone for TasksModule<R> {
    fn clone(&self) -> Self {
        Self {
            create_task: self.create_task.clone(),
            get_task_by_id: self.get_task_by_id.clone(),
            get_tasks: self.get_tasks.clone(),
            remove_task: self.remove_task.clone(),
            update_task: self.update_task.clone(),
        }
    }
}

impl<R: TaskRepository + 'static> TasksModule<R> {
    pub fn new(repository: R) -> Self {
        let repository = Arc::new(repository);
        Self {
            create_task: CreateTaskService::new(Arc::clone(&repository)),
            get_task_by_id: GetTaskByIdService::new(Arc::clone(&repository)),
            get_tasks: GetTasksService::new(Arc::clone(&repository)),
            remove_task: RemoveTaskService::new(Arc::clone(&repository)),
            update_task: UpdateTaskService::new(repository),
        }
    }

    /// Routes relative to the collection root; mount with `nest("/tasks", ..)`.
    pub fn router(self) -> Router {
        Router::new()
            .route(
                "/",
                get(get_tasks::get_tasks::<R>).post(create_task::create_task::<R>),
            )
            .route(
                "/{id}",
                get(get_task_by_id::get_task_by_id::<R>)
                    .put(update_task::update_task::<R>)
                    .delete(remove_task::remove_task::<R>),
            )
            .with_state(self)
    }
}

macro_rules! service_from_module {
    ($($service:ident => $field:ident),* $(,)?) => {
        $(
            impl<R: TaskRepository> FromRef<TasksModule<R>> for $service<R> {
                fn from_ref(module: &TasksModule<R>) -> Self {
                    module.$field.clone()
                }
            }
        )*
    };
}

service_from_module! {
    CreateTaskService => create_task,
    GetTaskByIdService => get_task_by_id,
    GetTasksService => get_tasks,
    RemoveTaskService => remove_task,
    UpdateTaskService => update_task,
}
