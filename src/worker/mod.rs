//! Content workers
//!
//! A content worker turns an article URL into a [`ProcessedArticle`](crate::ProcessedArticle):
//! scraped metadata, an English summary, translations and optionally rendered
//! media. The heavy lifting happens in an external program; this module owns
//! how that program is started, fed, bounded and interpreted.
//!
//! ## Architecture
//!
//! The core abstraction is the [`ContentWorker`] trait. Implementations:
//!
//! - [`ProcessWorker`]: one external process per article, JSON over stdio
//! - [`BoundedWorker`]: wraps another worker with a concurrency cap and a deadline
//! - [`UnavailableWorker`]: stand-in when no worker program can be found
//!
//! [`from_config`] assembles the production stack from [`WorkerConfig`].

mod bounded;
mod document;
mod parser;
mod process;
mod traits;
mod unavailable;

pub use bounded::BoundedWorker;
pub use parser::{ExitStatus, extract_error_message, parse_worker_output};
pub use process::ProcessWorker;
pub use traits::{ContentWorker, WorkerCapabilities};
pub use unavailable::UnavailableWorker;

use crate::config::WorkerConfig;
use std::sync::Arc;

/// Interpreter looked up on PATH when no worker program is configured
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Build the worker described by `config`
///
/// An explicitly configured program is used as-is. Otherwise the default
/// interpreter is searched on PATH (when `search_path` is set); if nothing
/// is found the result is an [`UnavailableWorker`].
pub fn from_config(config: &WorkerConfig) -> Arc<dyn ContentWorker> {
    let program = match &config.program {
        Some(program) => Some(program.clone()),
        None if config.search_path => which::which(DEFAULT_INTERPRETER).ok(),
        None => None,
    };

    let Some(program) = program else {
        tracing::warn!(
            interpreter = DEFAULT_INTERPRETER,
            "no content worker program found, article processing is disabled"
        );
        return Arc::new(UnavailableWorker::new(format!(
            "{DEFAULT_INTERPRETER} not found in PATH"
        )));
    };

    tracing::info!(
        program = %program.display(),
        args = ?config.args,
        max_concurrent = config.max_concurrent,
        timeout_secs = config.timeout.as_secs(),
        "content worker configured"
    );

    let mut worker = ProcessWorker::new(program).with_args(config.args.clone());
    if let Some(dir) = &config.working_dir {
        worker = worker.with_working_dir(dir.clone());
    }
    Arc::new(BoundedWorker::new(
        worker,
        config.max_concurrent,
        config.timeout,
    ))
}
