use reqwest::Method;
use std::time::Duration;

use crate::error::{ClientError, ClientErrorKind};

/// Exponential backoff for failed HTTP calls.
///
/// Network failures are retried for every method. Server errors and timeouts
/// are retried only for methods that are safe to repeat.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    pub fn should_retry(&self, method: &Method, err: &ClientError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        match err.kind() {
            ClientErrorKind::NoResponse => true,
            ClientErrorKind::Timeout => is_idempotent(method),
            ClientErrorKind::Response => {
                is_idempotent(method) && err.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}
