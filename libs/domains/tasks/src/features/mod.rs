//! One module per operation. Each holds its request/response DTOs, a service
//! with a single `execute` entry point, and the HTTP handler binding the two.

pub mod create_task;
pub mod get_task_by_id;
pub mod get_tasks;
pub mod remove_task;
pub mod update_task;

use uuid::Uuid;

use crate::error::{TaskError, TaskResult};

/// Resolve a path id. A value that is not a UUID cannot name a stored task.
pub(crate) fn parse_task_id(raw: &str) -> TaskResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| TaskError::NotFound(raw.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{NewTask, Task, TaskStatus};

    pub fn stored_task(title: &str) -> Task {
        Task::from(NewTask {
            title: title.to_string(),
            status: TaskStatus::Pending,
            ..Default::default()
        })
    }
}
