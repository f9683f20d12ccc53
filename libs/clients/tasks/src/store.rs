//! Client-side task state.
//!
//! Every action is a single transition of [`TaskState`] published through a
//! `tokio::sync::watch` channel, so views can re-render on change.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

use crate::client::TaskApi;
use crate::error::{ClientError, ClientResult, describe_error};
use crate::types::{
    CreateTaskInput, Pagination, Task, TaskFilters, TaskQuery, UpdateTaskInput,
};

pub const FETCH_TASKS_FAILED: &str = "Failed to fetch tasks";
pub const FETCH_TASK_FAILED: &str = "Failed to fetch task";
pub const CREATE_TASK_FAILED: &str = "Failed to create task";
pub const UPDATE_TASK_FAILED: &str = "Failed to update task";
pub const DELETE_TASK_FAILED: &str = "Failed to delete task";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    /// Current page of the list
    pub tasks: Vec<Task>,
    pub selected_task: Option<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    pub filters: TaskFilters,
}

pub struct TaskStore<A: TaskApi> {
    api: A,
    state: watch::Sender<TaskState>,
    list_generation: AtomicU64,
    detail_generation: AtomicU64,
}

impl<A: TaskApi> TaskStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: watch::Sender::new(TaskState::default()),
            list_generation: AtomicU64::new(0),
            detail_generation: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Explicit `query` fields win over stored filters, which win over the
    /// stored pagination. A `None` field falls through, so a stored filter
    /// can only be dropped with [`set_filters`](Self::set_filters) or
    /// [`clear_filters`](Self::clear_filters).
    fn list_query(&self, query: TaskQuery) -> TaskQuery {
        let state = self.state.borrow();
        TaskQuery {
            page: query.page.or(Some(state.pagination.page)),
            limit: query.limit.or(Some(state.pagination.limit)),
            status: query.status.or(state.filters.status),
            priority: query.priority.or(state.filters.priority),
            search: query.search.or_else(|| state.filters.search.clone()),
        }
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Record a failure. Cancellations leave `error` untouched.
    fn fail(&self, err: &ClientError, fallback: &str) {
        let message = describe_error(err, fallback);
        self.state.send_modify(|s| {
            s.loading = false;
            if message.is_some() {
                s.error = message;
            }
        });
    }

    /// Load a page of tasks. Failures end up in `error`, never returned.
    pub async fn fetch_tasks(&self, query: TaskQuery) {
        let generation = self.list_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.list_query(query);
        self.begin();

        let result = self.api.list_tasks(&query).await;
        if self.list_generation.load(Ordering::SeqCst) != generation {
            // A newer fetch owns the list and the loading flag
            debug!(generation, "Discarding superseded list result");
            return;
        }

        match result {
            Ok(response) => self.state.send_modify(|s| {
                s.tasks = response.data;
                s.pagination = response.meta;
                s.loading = false;
            }),
            Err(err) => self.fail(&err, FETCH_TASKS_FAILED),
        }
    }

    /// Load one task into `selected_task`. Failures end up in `error`.
    pub async fn fetch_task_by_id(&self, id: &str) {
        let generation = self.detail_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin();

        let result = self.api.get_task(id).await;
        if self.detail_generation.load(Ordering::SeqCst) != generation {
            return;
        }

        match result {
            Ok(task) => self.state.send_modify(|s| {
                s.selected_task = Some(task);
                s.loading = false;
            }),
            Err(err) => self.fail(&err, FETCH_TASK_FAILED),
        }
    }

    /// Create a task and prepend it to the current page.
    ///
    /// The page keeps at most `limit` rows and `total_pages` follows the new
    /// total.
    pub async fn create_task(&self, input: &CreateTaskInput) -> ClientResult<Task> {
        self.begin();
        match self.api.create_task(input).await {
            Ok(task) => {
                self.state.send_modify(|s| {
                    s.tasks.insert(0, task.clone());
                    s.pagination.total += 1;
                    if s.pagination.limit > 0 {
                        s.tasks.truncate(s.pagination.limit as usize);
                        s.pagination.total_pages =
                            s.pagination.total.div_ceil(s.pagination.limit);
                    }
                    s.loading = false;
                });
                Ok(task)
            }
            Err(err) => {
                self.fail(&err, CREATE_TASK_FAILED);
                Err(err)
            }
        }
    }

    /// Update a task, then refresh the list.
    pub async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ClientResult<Task> {
        self.begin();
        match self.api.update_task(id, input).await {
            Ok(task) => {
                self.state.send_modify(|s| {
                    s.selected_task = Some(task.clone());
                });
                self.fetch_tasks(TaskQuery::default()).await;
                Ok(task)
            }
            Err(err) => {
                self.fail(&err, UPDATE_TASK_FAILED);
                Err(err)
            }
        }
    }

    /// Delete a task, then refresh the list.
    pub async fn delete_task(&self, id: &str) -> ClientResult<()> {
        self.begin();
        match self.api.delete_task(id).await {
            Ok(_) => {
                self.state.send_modify(|s| {
                    if s
                        .selected_task
                        .as_ref()
                        .is_some_and(|t| t.id.to_string() == id)
                    {
                        s.selected_task = None;
                    }
                });
                self.fetch_tasks(TaskQuery::default()).await;
                Ok(())
            }
            Err(err) => {
                self.fail(&err, DELETE_TASK_FAILED);
                Err(err)
            }
        }
    }

    /// Replace the filters and go back to the first page.
    pub fn set_filters(&self, filters: TaskFilters) {
        self.state.send_modify(|s| {
            s.filters = filters;
            s.pagination.page = 1;
        });
    }

    pub fn set_page(&self, page: u64) {
        self.state.send_modify(|s| s.pagination.page = page.max(1));
    }

    pub fn set_limit(&self, limit: u64) {
        self.state.send_modify(|s| {
            s.pagination.limit = limit;
            s.pagination.page = 1;
        });
    }

    pub fn clear_filters(&self) {
        self.state.send_modify(|s| {
            s.filters = TaskFilters::default();
            s.pagination.page = 1;
        });
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_selected_task(&self) {
        self.state.send_modify(|s| s.selected_task = None);
    }
}
