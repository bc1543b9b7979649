//! Concurrency and deadline limits for a content worker

use super::traits::{ContentWorker, WorkerCapabilities};
use crate::error::WorkerError;
use crate::types::ProcessedArticle;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Decorator that bounds how many invocations run at once and how long each may take
///
/// Requests beyond `max_concurrent` are rejected immediately with
/// [`WorkerError::CapacityExceeded`] rather than queued. An invocation that
/// outlives `timeout` is dropped, which kills a [`ProcessWorker`](super::ProcessWorker)
/// child, and reported as [`WorkerError::TimedOut`].
pub struct BoundedWorker<W> {
    inner: W,
    permits: Semaphore,
    max_concurrent: usize,
    timeout: Duration,
}

impl<W: ContentWorker> BoundedWorker<W> {
    /// Wrap `inner` with the given limits
    pub fn new(inner: W, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_concurrent),
            max_concurrent,
            timeout,
        }
    }

    /// Number of invocations currently running
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }
}

#[async_trait]
impl<W: ContentWorker> ContentWorker for BoundedWorker<W> {
    async fn process(&self, url: &Url) -> crate::Result<ProcessedArticle> {
        let _permit = self.permits.try_acquire().map_err(|_| {
            tracing::warn!(
                url = %url,
                limit = self.max_concurrent,
                "rejecting article, all worker slots busy"
            );
            WorkerError::CapacityExceeded {
                limit: self.max_concurrent,
            }
        })?;

        match tokio::time::timeout(self.timeout, self.inner.process(url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    url = %url,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "worker exceeded its deadline and was stopped"
                );
                Err(WorkerError::TimedOut {
                    timeout: self.timeout,
                }
                .into())
            }
        }
    }

    fn capabilities(&self) -> WorkerCapabilities {
        WorkerCapabilities {
            max_concurrent: Some(self.max_concurrent),
            timeout: Some(self.timeout),
            ..self.inner.capabilities()
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
