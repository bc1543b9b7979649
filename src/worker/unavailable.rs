//! Stand-in worker for when no worker program can be found

use super::traits::{ContentWorker, WorkerCapabilities};
use crate::types::ProcessedArticle;
use async_trait::async_trait;
use url::Url;

/// Worker used when no worker executable is available or configured
///
/// Every call fails with `Error::NotSupported`, so searching keeps working
/// while article processing reports a clear configuration problem.
///
/// # Examples
///
/// ```
/// use newsdesk::worker::{ContentWorker, UnavailableWorker};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let worker = UnavailableWorker::new("python3 not found in PATH");
/// let result = worker.process(&"https://example.com/a".parse()?).await;
/// assert!(result.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UnavailableWorker {
    reason: String,
}

impl UnavailableWorker {
    /// Create a stand-in that reports `reason` on every call
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ContentWorker for UnavailableWorker {
    async fn process(&self, _url: &Url) -> crate::Result<ProcessedArticle> {
        Err(crate::Error::NotSupported(format!(
            "article processing requires a content worker: {}. \
             Set worker.program in config or NEWSDESK_WORKER_PROGRAM.",
            self.reason
        )))
    }

    fn capabilities(&self) -> WorkerCapabilities {
        WorkerCapabilities::default()
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToHttpStatus;

    #[tokio::test]
    async fn process_returns_not_supported() {
        let worker = UnavailableWorker::new("python3 not found in PATH");
        let err = worker
            .process(&Url::parse("https://example.com/a").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 501);
        assert!(err.to_string().contains("python3 not found in PATH"));
    }

    #[test]
    fn capabilities_report_nothing() {
        let worker = UnavailableWorker::new("x");
        assert!(!worker.capabilities().can_process);
        assert_eq!(worker.name(), "unavailable");
    }
}
