//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`articles`]: search and article processing
//! - [`system`]: health, capabilities, OpenAPI

mod articles;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use articles::*;
pub use system::*;
