//! Application state for the API server

use crate::{Config, Gateway};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator for searches and article processing
    pub gateway: Arc<Gateway>,

    /// Configuration (read-only after startup)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(gateway: Arc<Gateway>, config: Arc<Config>) -> Self {
        Self { gateway, config }
    }
}
