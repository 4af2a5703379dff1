// src/application/scope.rs
//
// Lifetime of a view. Every request a view issues runs inside its scope;
// closing the scope aborts what is in flight and turns late results into
// `ClientError::Cancelled`, so a torn-down view never applies them.
use crate::domain::ClientError;
use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    closed: AtomicBool,
    next_id: AtomicU64,
    in_flight: Mutex<Vec<(u64, AbortHandle)>>,
}

impl Inner {
    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let handles = match self.in_flight.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        debug!(aborted = handles.len(), "View scope closed");
        for (_, handle) in handles {
            handle.abort();
        }
    }

    fn register(&self, handle: AbortHandle) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut guard) = self.in_flight.lock() {
            guard.push((id, handle));
        }
        id
    }

    fn unregister(&self, id: u64) {
        if let Ok(mut guard) = self.in_flight.lock() {
            guard.retain(|(other, _)| *other != id);
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewScope {
    inner: Arc<Inner>,
}

/// Cloneable handle that can close a [`ViewScope`] from another task.
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    inner: Arc<Inner>,
}

impl ScopeHandle {
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            inner: self.inner.clone(),
        }
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Run a request inside this scope.
    pub async fn run<T, F>(&self, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.is_closed() {
            return Err(ClientError::Cancelled);
        }

        let (handle, registration) = AbortHandle::new_pair();
        let id = self.inner.register(handle.clone());
        // close() may have drained the list between the check and register
        if self.is_closed() {
            handle.abort();
        }

        let outcome = Abortable::new(request, registration).await;
        self.inner.unregister(id);

        match outcome {
            Ok(_) if self.is_closed() => Err(ClientError::Cancelled),
            Ok(result) => result,
            Err(_aborted) => Err(ClientError::Cancelled),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn given_open_scope_when_running_then_returns_result() {
        let scope = ViewScope::new();

        let result = scope.run(async { Ok::<_, ClientError>(7) }).await;

        assert_eq!(result.expect("Request should succeed"), 7);
    }

    #[tokio::test]
    async fn given_open_scope_when_request_fails_then_error_passes_through() {
        let scope = ViewScope::new();

        let result: Result<(), _> = scope.run(async { Err(ClientError::InvalidId) }).await;

        assert!(matches!(result, Err(ClientError::InvalidId)));
    }

    #[tokio::test]
    async fn given_closed_scope_when_running_then_cancelled_without_polling() {
        let scope = ViewScope::new();
        scope.close();

        let polled = AtomicBool::new(false);

        let result = scope
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok::<_, ClientError>(())
            })
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn given_in_flight_request_when_handle_closes_scope_then_cancelled() {
        let scope = ViewScope::new();
        let handle = scope.handle();

        let closer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.close();
        });
        let result = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, ClientError>(())
            })
            .await;
        closer.await.expect("Closer task should finish");

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn given_dropped_scope_when_checking_handle_then_closed() {
        let scope = ViewScope::new();
        let handle = scope.handle();

        drop(scope);

        assert!(handle.is_closed());
    }
}
