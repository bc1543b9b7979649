//! Shared test helpers: fake workers, shell-script workers and provider fixtures.

use crate::error::WorkerError;
use crate::types::ProcessedArticle;
use crate::worker::{ContentWorker, ProcessWorker, WorkerCapabilities};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use url::Url;

/// Write `body` to a script in `dir` and return a worker that runs it with `sh`.
///
/// Running through `sh` avoids executing a freshly written file, which can
/// fail with ETXTBSY when tests run in parallel.
pub(crate) fn shell_worker(dir: &Path, body: &str) -> ProcessWorker {
    let script = dir.join(format!("worker-{}.sh", next_script_id()));
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    ProcessWorker::new(PathBuf::from("sh")).with_args(vec![script.display().to_string()])
}

fn next_script_id() -> usize {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

enum FakeBehavior {
    Succeed(ProcessedArticle),
    Fail(String),
    Block,
}

/// In-memory worker that counts its invocations
pub(crate) struct FakeWorker {
    behavior: FakeBehavior,
    calls: Arc<AtomicUsize>,
    release: Arc<Notify>,
}

impl FakeWorker {
    fn with_behavior(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            release: Arc::new(Notify::new()),
        }
    }

    /// Always returns an article with `summary` and a Hindi translation
    pub(crate) fn succeeding(summary: &str) -> Self {
        let mut article = ProcessedArticle {
            title: Some("Fake article".into()),
            summary: summary.into(),
            ..Default::default()
        };
        article
            .translations
            .insert("hindi".into(), format!("[hi] {summary}"));
        Self::with_behavior(FakeBehavior::Succeed(article))
    }

    /// Always returns `article`
    pub(crate) fn returning(article: ProcessedArticle) -> Self {
        Self::with_behavior(FakeBehavior::Succeed(article))
    }

    /// Always fails with `message`
    pub(crate) fn failing(message: &str) -> Self {
        Self::with_behavior(FakeBehavior::Fail(message.into()))
    }

    /// Waits until released through [`FakeWorker::release_handle`]
    pub(crate) fn blocking() -> Self {
        Self::with_behavior(FakeBehavior::Block)
    }

    /// Shared invocation counter
    pub(crate) fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Notify once per blocked call to let it finish
    pub(crate) fn release_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.release)
    }
}

#[async_trait]
impl ContentWorker for FakeWorker {
    async fn process(&self, _url: &Url) -> crate::Result<ProcessedArticle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FakeBehavior::Succeed(article) => Ok(article.clone()),
            FakeBehavior::Fail(message) => Err(WorkerError::Failed {
                exit_code: Some(1),
                message: message.clone(),
                diagnostics: format!("{{\"error\": \"{message}\"}}"),
            }
            .into()),
            FakeBehavior::Block => {
                self.release.notified().await;
                Ok(ProcessedArticle {
                    summary: "released".into(),
                    ..Default::default()
                })
            }
        }
    }

    fn capabilities(&self) -> WorkerCapabilities {
        WorkerCapabilities {
            can_process: true,
            ..Default::default()
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// One record in the search provider's response format
pub(crate) fn provider_article(title: &str, description: &str, url: &str) -> serde_json::Value {
    serde_json::json!({
        "source": {"id": null, "name": "Example News"},
        "author": "Staff",
        "title": title,
        "description": description,
        "url": url,
        "urlToImage": format!("{url}/lead.jpg"),
        "publishedAt": "2024-05-01T10:00:00Z",
        "content": format!("{description} [+1200 chars]")
    })
}

/// Successful provider response wrapping `articles`
pub(crate) fn provider_response(articles: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "totalResults": articles.len(),
        "articles": articles
    })
}
