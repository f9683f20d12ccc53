use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::types::ApiErrorBody;

/// Shown when a request went out but nothing came back.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
/// Shown when a request could not even be sent.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Superseded or explicitly aborted; never a user-visible failure.
    Cancelled,
    Timeout,
    /// The server answered with a non-2xx status.
    Response,
    /// The request was made but no response was received.
    NoResponse,
    /// The request never left the client.
    NotSent,
    /// A 2xx body that does not match the expected shape.
    Decode,
}

#[derive(Debug, Clone, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct ClientError {
    kind: ClientErrorKind,
    message: Option<String>,
    status: Option<StatusCode>,
    body: Option<ApiErrorBody>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: Option<String>) -> Self {
        Self {
            kind,
            message: message.filter(|m| !m.is_empty()),
            status: None,
            body: None,
        }
    }

    pub fn cancelled() -> Self {
        Self::new(
            ClientErrorKind::Cancelled,
            Some("request cancelled".to_string()),
        )
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ClientErrorKind::Timeout,
            Some(format!("timeout of {}ms exceeded", after.as_millis())),
        )
    }

    pub fn response(status: StatusCode, body: Option<ApiErrorBody>) -> Self {
        Self {
            kind: ClientErrorKind::Response,
            message: Some(format!(
                "Request failed with status code {}",
                status.as_u16()
            )),
            status: Some(status),
            body,
        }
    }

    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> Option<&ApiErrorBody> {
        self.body.as_ref()
    }

    /// Transport-level message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ClientErrorKind::Cancelled
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(timeout)
        } else if err.is_builder() {
            Self::new(ClientErrorKind::NotSent, Some(err.to_string()))
        } else if err.is_decode() {
            Self::new(ClientErrorKind::Decode, Some(err.to_string()))
        } else {
            Self::new(ClientErrorKind::NoResponse, Some(err.to_string()))
        }
    }
}

/// Turn a failed call into the text a user should see.
///
/// Returns `None` for cancellations, which are not failures. Otherwise the
/// first available source wins: the server's error message, the transport
/// message, a fixed network or unexpected-error message, then `fallback`.
pub fn describe_error(err: &ClientError, fallback: &str) -> Option<String> {
    if err.is_cancelled() {
        return None;
    }

    if let Some(message) = err
        .body()
        .and_then(|body| body.message.as_deref())
        .filter(|m| !m.is_empty())
    {
        return Some(message.to_string());
    }

    if let Some(message) = err.message() {
        return Some(message.to_string());
    }

    match err.kind() {
        ClientErrorKind::NoResponse => Some(NETWORK_ERROR_MESSAGE.to_string()),
        ClientErrorKind::NotSent => Some(UNEXPECTED_ERROR_MESSAGE.to_string()),
        _ => Some(fallback.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Failed to fetch tasks";

    #[test]
    fn test_cancelled_is_suppressed() {
        assert_eq!(describe_error(&ClientError::cancelled(), FALLBACK), None);
    }

    #[test]
    fn test_server_message_wins() {
        let err = ClientError::response(
            StatusCode::NOT_FOUND,
            Some(ApiErrorBody {
                message: Some("Task with ID x not found".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(
            describe_error(&err, FALLBACK).as_deref(),
            Some("Task with ID x not found")
        );
    }

    #[test]
    fn test_transport_message_used_without_body() {
        let err = ClientError::response(StatusCode::BAD_GATEWAY, None);
        assert_eq!(
            describe_error(&err, FALLBACK).as_deref(),
            Some("Request failed with status code 502")
        );

        let err = ClientError::timeout(Duration::from_secs(30));
        assert_eq!(
            describe_error(&err, FALLBACK).as_deref(),
            Some("timeout of 30000ms exceeded")
        );
    }

    #[test]
    fn test_no_response_without_message() {
        let err = ClientError::new(ClientErrorKind::NoResponse, None);
        assert_eq!(
            describe_error(&err, FALLBACK).as_deref(),
            Some(NETWORK_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_not_sent_without_message() {
        let err = ClientError::new(ClientErrorKind::NotSent, Some(String::new()));
        assert_eq!(
            describe_error(&err, FALLBACK).as_deref(),
            Some(UNEXPECTED_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_fallback_is_last_resort() {
        let err = ClientError::new(ClientErrorKind::Decode, None);
        assert_eq!(describe_error(&err, FALLBACK).as_deref(), Some(FALLBACK));
    }
}
