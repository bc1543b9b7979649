//! Search provider abstraction

use crate::types::ArticleSummary;
use async_trait::async_trait;

/// Trait for keyword news search backends
///
/// Implementations return only complete records (non-blank title,
/// description, url, body content and source name), in the provider's
/// relevance order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for articles matching `query`
    ///
    /// `query` is already trimmed and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Network`] when the provider cannot be reached
    /// and [`crate::Error::Provider`] when it answers with an error.
    async fn search(&self, query: &str) -> crate::Result<Vec<ArticleSummary>>;

    /// Get the name of this provider implementation
    fn name(&self) -> &'static str;
}
