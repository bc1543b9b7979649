//! Request orchestration between the HTTP surface and its collaborators

use crate::config::Config;
use crate::error::{Error, Result};
use crate::search::{NewsApiProvider, SearchProvider};
use crate::types::{Capabilities, ProcessedArticle, SearchResults};
use crate::worker::{self, ContentWorker};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Stateless orchestrator for searches and article processing
///
/// Holds the search provider and content worker; no state is kept between
/// requests. Cloning is cheap.
#[derive(Clone)]
pub struct Gateway {
    search: Arc<dyn SearchProvider>,
    worker: Arc<dyn ContentWorker>,
}

impl Gateway {
    /// Create a gateway from explicit collaborators
    pub fn new(search: Arc<dyn SearchProvider>, worker: Arc<dyn ContentWorker>) -> Self {
        Self { search, worker }
    }

    /// Build the production gateway: NewsAPI search plus the configured worker
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let search = NewsApiProvider::new(&config.search)?;
        Ok(Self::new(Arc::new(search), worker::from_config(&config.worker)))
    }

    /// Search for articles matching `query`
    ///
    /// Blank queries are rejected before the provider is contacted.
    pub async fn search_articles(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("query", "query must not be empty"));
        }

        let started = Instant::now();
        let articles = self.search.search(query).await.inspect_err(|e| {
            tracing::warn!(query = %query, provider = self.search.name(), error = %e, "search failed");
        })?;
        tracing::info!(
            query = %query,
            count = articles.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search completed"
        );
        Ok(SearchResults::new(articles))
    }

    /// Run the content worker once on `url`
    ///
    /// The URL must be an absolute http(s) URL with a host; otherwise the
    /// worker is never invoked.
    pub async fn process_article(&self, url: &str) -> Result<ProcessedArticle> {
        let url = validate_article_url(url)?;

        let started = Instant::now();
        let article = self.worker.process(&url).await.inspect_err(|e| {
            tracing::warn!(url = %url, worker = self.worker.name(), error = %e, "article processing failed");
        })?;
        tracing::info!(
            url = %url,
            has_summary = article.has_summary(),
            translations = article.translations.len(),
            media = article.media_artifacts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "article processed"
        );
        Ok(article)
    }

    /// Describe runtime limits for `GET /capabilities`
    pub fn capabilities(&self, config: &Config) -> Capabilities {
        let worker = self.worker.capabilities();
        Capabilities {
            worker: self.worker.name().to_string(),
            max_concurrent_workers: worker.max_concurrent.unwrap_or(config.worker.max_concurrent),
            worker_timeout_secs: worker.timeout.unwrap_or(config.worker.timeout).as_secs(),
            search_page_size: config.search.page_size,
            search_language: config.search.language.clone(),
        }
    }
}

/// Parse `raw` as an absolute http(s) URL with a host
pub fn validate_article_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation("url", "url must not be empty"));
    }
    let url = Url::parse(raw)
        .map_err(|e| Error::validation("url", format!("invalid url '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(
            "url",
            format!("unsupported url scheme '{}', expected http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::validation("url", format!("url '{raw}' has no host")));
    }
    Ok(url)
}
