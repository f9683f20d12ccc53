use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::cancel::CancelRegistry;
use crate::error::{ClientError, ClientErrorKind, ClientResult};
use crate::retry::RetryPolicy;
use crate::types::{
    ApiErrorBody, CreateTaskInput, DeleteTaskResponse, Task, TaskListResponse, TaskQuery,
    UpdateTaskInput,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cancellation key shared by list fetches.
pub const LIST_KEY: &str = "tasks:list";
/// Cancellation key shared by single-task fetches.
pub const DETAIL_KEY: &str = "tasks:detail";

/// Operations the store needs from the tasks API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, query: &TaskQuery) -> ClientResult<TaskListResponse>;

    async fn get_task(&self, id: &str) -> ClientResult<Task>;

    async fn create_task(&self, input: &CreateTaskInput) -> ClientResult<Task>;

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ClientResult<Task>;

    async fn delete_task(&self, id: &str) -> ClientResult<DeleteTaskResponse>;
}

/// HTTP implementation of [`TaskApi`] on top of reqwest.
///
/// `base_url` includes the API prefix, e.g. `http://localhost:3000/api/v1`.
pub struct TaskApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    inflight: CancelRegistry,
}

impl TaskApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_options(base_url, DEFAULT_TIMEOUT, RetryPolicy::default())
    }

    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::new(ClientErrorKind::NotSent, Some(e.to_string())))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            retry,
            inflight: CancelRegistry::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Abort the in-flight request registered under `key`.
    pub fn cancel(&self, key: &str) -> bool {
        self.inflight.cancel(key)
    }

    pub fn cancel_all(&self) {
        self.inflight.cancel_all();
    }

    fn url(&self, path: &str) -> String {
        format!("{}/tasks{}", self.base_url, path)
    }

    async fn send<T, F>(&self, method: Method, path: &str, build: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            let request = build(self.http.request(method.clone(), &url));
            match self.send_once(request).await {
                Ok(value) => return Ok(value),
                Err(err) if self.retry.should_retry(&method, &err, attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        %method,
                        %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;
            let body = serde_json::from_slice::<ApiErrorBody>(&bytes).ok();
            return Err(ClientError::response(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::new(ClientErrorKind::Decode, Some(e.to_string())))
    }
}

#[async_trait]
impl TaskApi for TaskApiClient {
    #[instrument(skip(self))]
    async fn list_tasks(&self, query: &TaskQuery) -> ClientResult<TaskListResponse> {
        self.inflight
            .run(LIST_KEY, self.send(Method::GET, "", |req| req.query(query)))
            .await
    }

    #[instrument(skip(self))]
    async fn get_task(&self, id: &str) -> ClientResult<Task> {
        let path = format!("/{}", id);
        self.inflight
            .run(DETAIL_KEY, self.send(Method::GET, &path, |req| req))
            .await
    }

    #[instrument(skip(self, input))]
    async fn create_task(&self, input: &CreateTaskInput) -> ClientResult<Task> {
        self.send(Method::POST, "", |req| req.json(input)).await
    }

    #[instrument(skip(self, input))]
    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ClientResult<Task> {
        let path = format!("/{}", id);
        self.send(Method::PUT, &path, |req| req.json(input)).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> ClientResult<DeleteTaskResponse> {
        let path = format!("/{}", id);
        self.send(Method::DELETE, &path, |req| req).await
    }
}
