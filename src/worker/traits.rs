//! Traits and types for content workers

use crate::types::ProcessedArticle;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Capabilities of a content worker implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerCapabilities {
    /// Can process articles at all
    pub can_process: bool,
    /// Concurrency limit enforced by this worker, if any
    pub max_concurrent: Option<usize>,
    /// Per-invocation deadline enforced by this worker, if any
    pub timeout: Option<Duration>,
}

/// Trait for article processing backends
///
/// A worker turns one article URL into a [`ProcessedArticle`]: scraped
/// metadata, an English summary, translations and optional rendered media.
/// Implementations can run an external program, decorate another worker
/// with limits, or stand in when nothing is installed.
///
/// # Examples
///
/// ```no_run
/// use newsdesk::worker::{ContentWorker, ProcessWorker};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let worker = ProcessWorker::new(PathBuf::from("/usr/bin/python3"))
///     .with_args(vec!["nlp_service.py".into()]);
///
/// let url = url::Url::parse("https://example.com/story")?;
/// let article = worker.process(&url).await?;
/// println!("{}", article.summary);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ContentWorker: Send + Sync {
    /// Process one article
    ///
    /// Each call is an independent invocation; two calls with the same URL
    /// do two full units of work.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Worker`] when the worker fails, times out,
    /// produces malformed output or is over capacity, and
    /// [`crate::Error::NotSupported`] when no worker is available.
    async fn process(&self, url: &Url) -> crate::Result<ProcessedArticle>;

    /// Get the capabilities of this worker
    fn capabilities(&self) -> WorkerCapabilities;

    /// Get the name of this worker implementation
    fn name(&self) -> &'static str;
}
