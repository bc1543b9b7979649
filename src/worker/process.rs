//! Subprocess-based content worker

use super::parser::{ExitStatus, parse_worker_output};
use super::traits::{ContentWorker, WorkerCapabilities};
use crate::error::WorkerError;
use crate::types::{ProcessedArticle, WorkerRequest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use url::Url;

/// Content worker that runs one external process per article
///
/// The process receives `{"url": "..."}` on stdin (which is then closed),
/// writes a single JSON document to stdout and exits 0. On failure it exits
/// non-zero and describes the problem on stderr, ideally as
/// `{"error": "..."}`.
///
/// The child is spawned with kill-on-drop: if the caller stops waiting
/// (deadline, client disconnect) the process is killed.
///
/// # Examples
///
/// ```no_run
/// use newsdesk::worker::{ContentWorker, ProcessWorker};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let worker = ProcessWorker::from_path("python3")
///     .expect("python3 not found in PATH")
///     .with_args(vec!["backend/nlp_service.py".into()]);
///
/// let article = worker.process(&"https://example.com/a".parse()?).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProcessWorker {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessWorker {
    /// Create a worker running `program` with no arguments
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Attempt to find `program` in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path(program: &str) -> Option<Self> {
        which::which(program).ok().map(Self::new)
    }

    /// Arguments passed on every invocation (e.g. the script path)
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Run the process in `dir` instead of the gateway's working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Program executed for each invocation
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl ContentWorker for ProcessWorker {
    async fn process(&self, url: &Url) -> crate::Result<ProcessedArticle> {
        let payload = serde_json::to_vec(&WorkerRequest {
            url: url.to_string(),
        })?;

        let started = Instant::now();
        let mut child = self.command().spawn().map_err(|e| WorkerError::Spawn {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(url = %url, pid = ?child.id(), "worker started");

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                // The worker may legitimately exit before reading its input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(url = %url, "worker closed stdin before reading the request");
                }
                Err(e) => {
                    return Err(WorkerError::Io(format!("failed to write worker request: {e}")).into());
                }
            }
            // Closing stdin signals end of input
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| WorkerError::Io(format!("failed to collect worker output: {e}")))?;

        let exit_status = ExitStatus::from(output.status);
        let diagnostics = String::from_utf8_lossy(&output.stderr);
        if !diagnostics.trim().is_empty() {
            tracing::debug!(url = %url, diagnostics = %diagnostics.trim(), "worker diagnostics");
        }
        tracing::info!(
            url = %url,
            success = exit_status.is_success(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            stdout_bytes = output.stdout.len(),
            "worker finished"
        );

        parse_worker_output(&output.stdout, &output.stderr, exit_status)
    }

    fn capabilities(&self) -> WorkerCapabilities {
        WorkerCapabilities {
            can_process: true,
            max_concurrent: None,
            timeout: None,
        }
    }

    fn name(&self) -> &'static str {
        "process"
    }
}
