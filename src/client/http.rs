//! HTTP client for the gateway's article endpoints

use super::error::ClientError;
use crate::error::ApiError;
use crate::types::{ProcessRequest, ProcessedArticle, SearchRequest, SearchResults};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// The two gateway operations the article controller depends on
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// `POST /search_news`
    async fn search(&self, query: &str) -> Result<SearchResults, ClientError>;

    /// `POST /process_article`
    async fn process(&self, url: &str) -> Result<ProcessedArticle, ClientError>;
}

/// reqwest-backed [`GatewayApi`]
///
/// Non-2xx responses become [`ClientError::Gateway`] carrying the gateway's
/// `error` message and `code`.
///
/// # Examples
///
/// ```no_run
/// use newsdesk::client::{GatewayApi, GatewayClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GatewayClient::new("http://127.0.0.1:5000")?;
/// let results = client.search("monsoon").await?;
/// println!("{} articles", results.count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
}

impl GatewayClient {
    /// Default request timeout; covers a full worker run plus slack
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

    /// Create a client for the gateway at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsdesk-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(gateway_error(status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn search(&self, query: &str) -> Result<SearchResults, ClientError> {
        let body = SearchRequest {
            query: Some(query.to_string()),
        };
        self.post_json("search_news", &body).await
    }

    async fn process(&self, url: &str) -> Result<ProcessedArticle, ClientError> {
        let body = ProcessRequest {
            url: Some(url.to_string()),
        };
        self.post_json("process_article", &body).await
    }
}

fn gateway_error(status: StatusCode, body: &[u8]) -> ClientError {
    let retryable = status == StatusCode::SERVICE_UNAVAILABLE;
    match serde_json::from_slice::<ApiError>(body) {
        Ok(api_error) => ClientError::Gateway {
            status: status.as_u16(),
            code: api_error.code,
            message: api_error.error,
            retryable,
        },
        Err(_) => ClientError::Gateway {
            status: status.as_u16(),
            code: "http_error".to_string(),
            message: format!(
                "news gateway responded with {}",
                status.canonical_reason().unwrap_or(status.as_str())
            ),
            retryable,
        },
    }
}
