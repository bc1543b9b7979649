//! Article handlers: keyword search and one-shot processing.

use crate::api::AppState;
use crate::error::Error;
use crate::types::{ProcessRequest, ProcessedArticle, SearchRequest, SearchResults};
use axum::{Json, extract::State, extract::rejection::JsonRejection};

/// POST /search_news - Search for news articles
#[utoipa::path(
    post,
    path = "/search_news",
    tag = "articles",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Complete articles in relevance order", body = SearchResults),
        (status = 400, description = "Missing or empty query", body = crate::error::ApiError),
        (status = 500, description = "Search provider failure", body = crate::error::ApiError)
    )
)]
pub async fn search_news(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResults>, Error> {
    let Json(request) = payload?;
    let query = request
        .query
        .ok_or_else(|| Error::validation("query", "missing required field: query"))?;

    let results = state.gateway.search_articles(&query).await?;
    Ok(Json(results))
}

/// POST /process_article - Summarize and translate one article
#[utoipa::path(
    post,
    path = "/process_article",
    tag = "articles",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Processed article", body = ProcessedArticle),
        (status = 400, description = "Missing or malformed url", body = crate::error::ApiError),
        (status = 500, description = "Worker failure, malformed worker output or timeout", body = crate::error::ApiError),
        (status = 501, description = "No content worker available", body = crate::error::ApiError),
        (status = 503, description = "All worker slots busy, retry later", body = crate::error::ApiError)
    )
)]
pub async fn process_article(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessedArticle>, Error> {
    let Json(request) = payload?;
    let url = request
        .url
        .ok_or_else(|| Error::validation("url", "missing required field: url"))?;

    let article = state.gateway.process_article(&url).await?;
    Ok(Json(article))
}
