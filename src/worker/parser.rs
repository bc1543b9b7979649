//! Parser for content worker output

use super::document::normalize_document;
use crate::error::{Error, WorkerError};
use crate::types::ProcessedArticle;
use serde::Deserialize;

/// Message used when a failed worker left no diagnostics at all
const GENERIC_FAILURE: &str = "content worker failed without reporting an error";

/// Exit status of the worker process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The worker exited successfully (exit code 0)
    Success,
    /// The worker exited with a non-zero code, or was killed by a signal (`None`)
    Failure(Option<i32>),
}

impl ExitStatus {
    /// Returns `true` if the exit status represents success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failure(status.code())
        }
    }
}

/// Structured failure line written by the worker to stderr
#[derive(Deserialize)]
struct FailureLine {
    error: String,
}

/// Turn the captured output of one worker run into a result
///
/// On success stdout must hold exactly one JSON object. On failure the
/// user-facing message comes from the diagnostics, see
/// [`extract_error_message`].
pub fn parse_worker_output(
    stdout: &[u8],
    stderr: &[u8],
    exit_status: ExitStatus,
) -> crate::Result<ProcessedArticle> {
    let diagnostics = String::from_utf8_lossy(stderr);

    let ExitStatus::Failure(exit_code) = exit_status else {
        let document = serde_json::from_slice::<serde_json::Value>(stdout).map_err(|e| {
            tracing::debug!(
                stdout_bytes = stdout.len(),
                error = %e,
                "worker stdout is not a JSON document"
            );
            Error::Worker(WorkerError::InvalidOutput {
                reason: format!("stdout is not valid JSON: {e}"),
                diagnostics: diagnostics.to_string(),
            })
        })?;
        return normalize_document(document, &diagnostics);
    };

    Err(Error::Worker(WorkerError::Failed {
        exit_code,
        message: extract_error_message(&diagnostics),
        diagnostics: diagnostics.into_owned(),
    }))
}

/// Extract the user-facing message from a failed worker's stderr
///
/// Tries the last non-empty line, then the whole trimmed text, as a
/// `{"error": "..."}` object. Falls back to the trimmed raw text, or a
/// generic message when stderr is empty.
pub fn extract_error_message(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return GENERIC_FAILURE.to_string();
    }

    let last_line = trimmed
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty());

    last_line
        .into_iter()
        .chain(std::iter::once(trimmed))
        .find_map(|candidate| serde_json::from_str::<FailureLine>(candidate).ok())
        .map(|line| line.error)
        .unwrap_or_else(|| trimmed.to_string())
}
