//! Tasks API client
//!
//! HTTP client and client-side store for the tasks API:
//! - [`TaskApiClient`]: reqwest client with a 30 s timeout, exponential-backoff
//!   retries and keyed cancellation of superseded requests
//! - [`TaskStore`]: task list, selected task, filters and pagination, with
//!   failures normalized into user-facing messages by [`describe_error`]
//! - [`TaskForm`]: create/edit form validation

pub mod cancel;
pub mod client;
pub mod error;
pub mod form;
pub mod retry;
pub mod store;
pub mod types;

pub use cancel::CancelRegistry;
pub use client::{DEFAULT_TIMEOUT, DETAIL_KEY, LIST_KEY, TaskApi, TaskApiClient};
pub use error::{
    ClientError, ClientErrorKind, ClientResult, NETWORK_ERROR_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
    describe_error,
};
pub use form::{FormErrors, TaskForm};
pub use retry::RetryPolicy;
pub use store::{TaskState, TaskStore};
pub use types::{
    ApiErrorBody, CreateTaskInput, DeleteTaskResponse, Pagination, Task, TaskFilters,
    TaskListResponse, TaskPriority, TaskQuery, TaskStatus, UpdateTaskInput,
};
