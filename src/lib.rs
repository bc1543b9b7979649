//! # newsdesk
//!
//! News search gateway that hands individual articles to an external
//! summarization/translation worker.
//!
//! ## Overview
//!
//! - **Search** - keyword queries go to a NewsAPI-compatible provider; only
//!   complete records (title, description, url, content, source) come back
//! - **Process** - one article URL is handed to a one-shot worker process that
//!   scrapes, summarizes and translates it; its JSON document is returned
//! - **Bounded** - worker runs have a deadline, are killed when the client
//!   goes away, and are capped in number
//! - **Client** - a state machine for front ends: one visible result area,
//!   language tabs, advisories and narration
//!
//! ## Quick Start
//!
//! ```no_run
//! use newsdesk::{Config, Gateway};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.search.api_key = Some("your-newsapi-key".to_string());
//!     config.worker.args = vec!["backend/nlp_service.py".to_string()];
//!
//!     let config = Arc::new(config);
//!     let gateway = Arc::new(Gateway::from_config(&config)?);
//!
//!     // Serves until SIGINT/SIGTERM
//!     newsdesk::api::start_api_server(gateway, config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Front-end state machine and gateway client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Request orchestration
pub mod gateway;
/// News search providers
pub mod search;
/// Core types
pub mod types;
/// Content workers
pub mod worker;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{ApiConfig, Config, SearchConfig, WorkerConfig};
pub use error::{ApiError, Error, Result, ToHttpStatus, WorkerError};
pub use gateway::Gateway;
pub use search::{NewsApiProvider, SearchProvider};
pub use types::{ArticleSummary, Capabilities, ProcessedArticle, SearchResults};
pub use worker::{BoundedWorker, ContentWorker, ProcessWorker, UnavailableWorker};

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Used as the graceful-shutdown trigger of [`api::start_api_server`].
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Wait for a termination signal (Ctrl+C on non-Unix platforms).
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
