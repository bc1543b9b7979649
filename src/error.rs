//! Error types for newsdesk
//!
//! This module provides the error taxonomy shared by the gateway and its
//! collaborators:
//! - client-input errors (rejected before any collaborator is contacted)
//! - upstream search provider errors
//! - content worker failures, malformed worker output, timeouts and capacity
//! - HTTP status code mapping and the JSON error body returned by the API

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for newsdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Longest diagnostic excerpt copied into an API error body
const MAX_DETAIL_CHARS: usize = 4096;

/// Main error type for newsdesk
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "worker.timeout")
        key: Option<String>,
    },

    /// A required request field is missing or malformed
    #[error("{message}")]
    Validation {
        /// Name of the offending request field
        field: String,
        /// Human-readable description of the problem
        message: String,
    },

    /// The search provider rejected or failed the request
    #[error("search provider error: {message}")]
    Provider {
        /// HTTP status returned by the provider, if a response was received
        status: Option<u16>,
        /// Provider-specific error code (e.g., "apiKeyInvalid")
        code: Option<String>,
        /// Message reported by the provider
        message: String,
    },

    /// Network error while talking to the search provider
    #[error("search provider unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Content worker error
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Operation not supported (missing worker executable, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Content worker errors
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker exited with a failure status
    ///
    /// Displays exactly the message extracted from the worker's diagnostics.
    #[error("{message}")]
    Failed {
        /// Process exit code (None when terminated by a signal)
        exit_code: Option<i32>,
        /// User-facing message extracted from the diagnostic channel
        message: String,
        /// Raw diagnostic output
        diagnostics: String,
    },

    /// The worker exited successfully but its output is not a JSON document
    #[error("worker produced malformed output: {reason}")]
    InvalidOutput {
        /// Why the output was rejected
        reason: String,
        /// Raw diagnostic output
        diagnostics: String,
    },

    /// The worker did not finish before its deadline and was killed
    #[error("worker timed out after {} seconds", timeout.as_secs_f64())]
    TimedOut {
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// Too many worker invocations are already in flight
    #[error("worker capacity exceeded: {limit} invocations already running")]
    CapacityExceeded {
        /// Configured concurrency limit
        limit: usize,
    },

    /// The worker process could not be started
    #[error("failed to start worker {}: {reason}", program.display())]
    Spawn {
        /// Program that failed to start
        program: PathBuf,
        /// The reason spawning failed
        reason: String,
    },

    /// Communication with the worker process failed
    #[error("worker I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create a client-input validation error for a request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if repeating the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Worker(WorkerError::CapacityExceeded { .. }) => true,
            Error::Worker(WorkerError::TimedOut { .. }) => true,
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            Error::Provider { status, .. } => matches!(status, Some(429) | Some(502..=504)),
            _ => false,
        }
    }

    /// Suggested client back-off, in seconds, for retryable capacity errors
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Error::Worker(WorkerError::CapacityExceeded { .. }) => Some(5),
            _ => None,
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "network timeout",
///   "code": "worker_failed",
///   "details": { "exit_code": 1 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message, suitable for display to end users
    pub error: String,

    /// Machine-readable error code (e.g., "validation_error", "worker_timeout")
    pub code: String,

    /// Optional additional context (provider status, worker diagnostics, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            details: Some(details),
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Validation { .. } => 400,
            Error::Config { .. } => 400,

            // 503 Service Unavailable - retryable capacity rejection
            Error::Worker(WorkerError::CapacityExceeded { .. }) => 503,

            // 500 Internal Server Error - upstream and worker failures
            Error::Provider { .. } => 500,
            Error::Network(_) => 500,
            Error::Worker(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 501 Not Implemented - no worker available
            Error::NotSupported(_) => 501,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation { .. } => "validation_error",
            Error::Provider { .. } => "provider_error",
            Error::Network(_) => "network_error",
            Error::Worker(e) => match e {
                WorkerError::Failed { .. } => "worker_failed",
                WorkerError::InvalidOutput { .. } => "worker_output_invalid",
                WorkerError::TimedOut { .. } => "worker_timeout",
                WorkerError::CapacityExceeded { .. } => "capacity_exceeded",
                WorkerError::Spawn { .. } => "worker_unavailable",
                WorkerError::Io(_) => "worker_io_error",
            },
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::NotSupported(_) => "not_supported",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Validation { field, .. } => Some(serde_json::json!({
                "field": field,
            })),
            Error::Provider {
                status,
                code,
                message,
            } => Some(serde_json::json!({
                "provider_status": status,
                "provider_code": code,
                "provider_message": message,
            })),
            Error::Network(e) => Some(serde_json::json!({
                "timeout": e.is_timeout(),
                "connect": e.is_connect(),
            })),
            Error::Worker(WorkerError::Failed {
                exit_code,
                diagnostics,
                ..
            }) => Some(serde_json::json!({
                "exit_code": exit_code,
                "diagnostics": excerpt(diagnostics),
            })),
            Error::Worker(WorkerError::InvalidOutput {
                reason,
                diagnostics,
            }) => Some(serde_json::json!({
                "reason": reason,
                "diagnostics": excerpt(diagnostics),
            })),
            Error::Worker(WorkerError::TimedOut { timeout }) => Some(serde_json::json!({
                "timeout_seconds": timeout.as_secs_f64(),
            })),
            Error::Worker(WorkerError::CapacityExceeded { limit }) => Some(serde_json::json!({
                "limit": limit,
                "retry_after_seconds": error.retry_after_secs(),
            })),
            Error::Worker(WorkerError::Spawn { program, .. }) => Some(serde_json::json!({
                "program": program,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: message,
            code,
            details,
        }
    }
}

/// Keep the tail of long diagnostic output, where errors usually end up
fn excerpt(diagnostics: &str) -> &str {
    let trimmed = diagnostics.trim();
    let count = trimmed.chars().count();
    if count <= MAX_DETAIL_CHARS {
        return trimmed;
    }
    let skip = count - MAX_DETAIL_CHARS;
    match trimmed.char_indices().nth(skip) {
        Some((offset, _)) => &trimmed[offset..],
        None => trimmed,
    }
}
