//! NewsAPI `/v2/everything` client

use super::provider::SearchProvider;
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::types::ArticleSummary;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Header carrying the provider credential
const API_KEY_HEADER: &str = "X-Api-Key";

/// Search provider backed by a NewsAPI-compatible endpoint
///
/// Every search asks for one page of `page_size` results in a single
/// language, sorted by relevance.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    language: String,
    sort_by: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ProviderArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderArticle {
    #[serde(default)]
    source: Option<ProviderSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSource {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiProvider {
    /// Create a provider from search configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is invalid, or
    /// [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let endpoint = format!("{}/v2/everything", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| Error::Config {
            message: format!("invalid search base URL '{}': {}", config.base_url, e),
            key: Some("search.base_url".to_string()),
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("no search API key configured, provider requests will likely be rejected");
        }

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            sort_by: config.sort_by.clone(),
            page_size: config.page_size,
        })
    }

    /// Endpoint queried for every search
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SearchProvider for NewsApiProvider {
    async fn search(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        let page_size = self.page_size.to_string();
        let mut request = self.client.get(self.endpoint.clone()).query(&[
            ("q", query),
            ("language", self.language.as_str()),
            ("sortBy", self.sort_by.as_str()),
            ("pageSize", page_size.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<ProviderResponse>(&body);

        if !status.is_success() {
            let (code, message) = match parsed {
                Ok(error) => (error.code, error.message),
                Err(_) => (None, None),
            };
            tracing::warn!(
                status = status.as_u16(),
                code = ?code,
                body = %body.trim(),
                "search provider returned an error"
            );
            return Err(Error::Provider {
                status: Some(status.as_u16()),
                code,
                message: message.unwrap_or_else(|| format!("provider responded with HTTP {status}")),
            });
        }

        let parsed = parsed.map_err(|e| Error::Provider {
            status: Some(status.as_u16()),
            code: None,
            message: format!("unreadable provider response: {e}"),
        })?;

        if parsed.status.as_deref() == Some("error") {
            return Err(Error::Provider {
                status: Some(status.as_u16()),
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| "provider reported an error".to_string()),
            });
        }

        let received = parsed.articles.len();
        let articles: Vec<ArticleSummary> =
            parsed.articles.into_iter().filter_map(into_summary).collect();
        tracing::debug!(
            query = %query,
            received,
            kept = articles.len(),
            "filtered provider results"
        );
        Ok(articles)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

/// Keep only records that can be shown and processed
fn into_summary(article: ProviderArticle) -> Option<ArticleSummary> {
    let source = article.source.and_then(|s| s.name);
    let missing = [
        ("title", &article.title),
        ("description", &article.description),
        ("url", &article.url),
        ("content", &article.content),
        ("source", &source),
    ]
    .into_iter()
    .find(|(_, value)| non_blank(value.as_deref()).is_none())
    .map(|(field, _)| field);

    if let Some(field) = missing {
        tracing::debug!(
            url = article.url.as_deref().unwrap_or("<none>"),
            missing = field,
            "dropping incomplete provider record"
        );
        return None;
    }

    Some(ArticleSummary {
        title: article.title?,
        description: article.description?,
        url: article.url?,
        source: source?,
        image: article.url_to_image.filter(|u| !u.trim().is_empty()),
        published_at: article.published_at,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
