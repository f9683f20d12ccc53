use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{Task, TaskPage, TaskQuery};

/// Repository trait for Task persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a fully-formed task and return the stored record
    async fn create(&self, task: Task) -> TaskResult<Task>;

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// One page of tasks matching the query, newest first
    async fn find_page(&self, query: TaskQuery) -> TaskResult<TaskPage>;

    /// Overwrite a stored task. `None` when the row no longer exists.
    async fn update(&self, task: Task) -> TaskResult<Option<Task>>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(task: &Task, query: &TaskQuery) -> bool {
    if query.status.is_some_and(|status| task.status != status) {
        return false;
    }
    if query.priority.is_some() && task.priority != query.priority {
        return false;
    }
    if let Some(ref search) = query.search {
        let needle = search.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&needle);
        let in_description = task
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_page(&self, query: TaskQuery) -> TaskResult<TaskPage> {
        let tasks = self.tasks.read().await;

        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| matches(t, &query))
            .cloned()
            .collect();

        // Newest first, id breaks ties
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let tasks = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(TaskPage { tasks, total })
    }

    async fn update(&self, task: Task) -> TaskResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;

        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                tracing::info!(task_id = %task.id, "Updated task");
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.remove(&id).is_some() {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
