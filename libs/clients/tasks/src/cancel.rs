use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ClientError, ClientResult};

/// In-flight requests keyed by logical operation.
///
/// Starting a request under a key aborts whatever was running under the
/// same key; the aborted call resolves to a cancelled [`ClientError`].
#[derive(Debug, Default)]
pub struct CancelRegistry {
    next_id: AtomicU64,
    inflight: Mutex<HashMap<String, (u64, AbortHandle)>>,
}

impl CancelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<T, F>(&self, key: &str, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        if let Some((_, previous)) = self.lock().insert(key.to_string(), (id, handle)) {
            tracing::debug!(key, "Cancelling superseded request");
            previous.abort();
        }

        let result = Abortable::new(fut, registration).await;

        {
            let mut inflight = self.lock();
            if inflight.get(key).is_some_and(|(current, _)| *current == id) {
                inflight.remove(key);
            }
        }

        result.unwrap_or_else(|_| Err(ClientError::cancelled()))
    }

    /// Abort the request running under `key`, if any.
    pub fn cancel(&self, key: &str) -> bool {
        match self.lock().remove(key) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, (_, handle)) in self.lock().drain() {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (u64, AbortHandle)>> {
        // A panic while holding the lock cannot leave the map inconsistent
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
