//! Error types for the gateway client and the article controller

use super::state::FlowScope;
use thiserror::Error;

/// Errors from talking to the gateway
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway could not be reached or the connection failed
    #[error("could not reach the news gateway: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with an error body
    ///
    /// Displays the gateway's human-readable message unchanged.
    #[error("{message}")]
    Gateway {
        /// HTTP status of the response
        status: u16,
        /// Machine-readable code from the error body
        code: String,
        /// Human-readable message from the error body
        message: String,
        /// Whether retrying the same request later may succeed
        retryable: bool,
    },

    /// The gateway answered 2xx but the body could not be decoded
    #[error("unexpected response from the news gateway: {0}")]
    Decode(String),

    /// The configured gateway address is not a usable URL
    #[error("invalid gateway address: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Machine-readable code, when the gateway supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Gateway { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns true if repeating the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Gateway { retryable, .. } => *retryable,
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Errors from the local speech capability
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No speech engine is installed or configured
    #[error("speech output is not available: {0}")]
    Unavailable(String),

    /// The speech engine could not be started
    #[error("speech output failed: {0}")]
    Failed(String),
}

/// Rejected user actions on the article controller
#[derive(Debug, Error)]
pub enum ControlError {
    /// The triggering control for this flow is disabled while it is in flight
    #[error("a {0} request is already in progress")]
    Busy(FlowScope),

    /// The user input cannot be submitted
    #[error("{0}")]
    InvalidInput(String),

    /// No search result at the selected position
    #[error("no search result at position {index}")]
    NoSuchArticle {
        /// Selected position
        index: usize,
    },

    /// No processed article is on screen
    #[error("no processed article is displayed")]
    NothingProcessed,

    /// The requested language tab does not exist for this article
    #[error("no '{0}' tab for this article")]
    NoSuchTab(String),

    /// The active tab has no text to narrate
    #[error("nothing to narrate for the selected language")]
    NothingToNarrate,

    /// There is no earlier result list to return to
    #[error("there are no earlier search results to return to")]
    NoEarlierResults,

    /// The speech capability failed
    #[error(transparent)]
    Speech(#[from] SpeechError),
}
