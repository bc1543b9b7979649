//! Core types for newsdesk

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Translation/media key used for the source-language rendering
pub const DEFAULT_LANGUAGE_KEY: &str = "default";

/// One search result
///
/// Only records with a non-blank title, description, url and source name
/// are ever produced; `publishedAt` is kept as the provider's string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    /// Headline
    pub title: String,
    /// Short description shown on the result card
    pub description: String,
    /// Canonical article URL, the identifier used for processing
    pub url: String,
    /// Publisher display name
    pub source: String,
    /// Lead image URL, if the provider supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Publication timestamp as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// Success envelope for a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    /// Number of articles in `articles`
    pub count: usize,
    /// Articles in provider order
    pub articles: Vec<ArticleSummary>,
}

impl SearchResults {
    /// Wrap a filtered article list
    pub fn new(articles: Vec<ArticleSummary>) -> Self {
        Self {
            count: articles.len(),
            articles,
        }
    }

    /// True when the search matched nothing usable
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Result of running the content worker on one article
///
/// Invariant: when `summary` is empty, `translations` and `media_artifacts`
/// are empty too.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedArticle {
    /// Extracted headline
    #[serde(default)]
    pub title: Option<String>,

    /// Lead image URL or local artifact path
    #[serde(default, alias = "top_image")]
    pub top_image: Option<String>,

    /// Article authors in byline order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication date as extracted from the page
    #[serde(default, alias = "publish_date")]
    pub publish_date: Option<String>,

    /// English summary; empty when summarization failed
    #[serde(default)]
    pub summary: String,

    /// Language name -> translated summary, successful translations only
    #[serde(default)]
    pub translations: BTreeMap<String, String>,

    /// Language name (or "default") -> rendered video/image reference
    #[serde(default, alias = "media_artifacts")]
    pub media_artifacts: BTreeMap<String, String>,

    /// Additional image URLs found on the page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Structured failure descriptor reported by the worker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl ProcessedArticle {
    /// True when the worker produced a usable summary
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    /// Text for a language tab; `"default"`/`"english"` select the summary
    pub fn text_for(&self, language: &str) -> Option<&str> {
        if language == DEFAULT_LANGUAGE_KEY || language.eq_ignore_ascii_case("english") {
            return self.has_summary().then_some(self.summary.as_str());
        }
        self.translations
            .get(language)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Body of `POST /search_news`
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Keyword query
    #[serde(default)]
    pub query: Option<String>,
}

/// Body of `POST /process_article`
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Absolute http(s) URL of the article to process
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload written to the worker's stdin
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Article URL
    pub url: String,
}

/// Runtime limits and identity reported by `GET /capabilities`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Name of the configured content worker
    pub worker: String,
    /// Maximum concurrent worker invocations
    pub max_concurrent_workers: usize,
    /// Per-invocation deadline in seconds
    pub worker_timeout_secs: u64,
    /// Results requested per search
    pub search_page_size: u32,
    /// Language filter applied to searches
    pub search_language: String,
}
