//! OpenAPI documentation and schema generation
//!
//! Served at `/openapi.json`, generated at compile time with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the newsdesk gateway API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "newsdesk gateway API",
        version = "0.1.0",
        description = "Keyword news search and one-shot article summarization/translation",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::api::routes::search_news,
        crate::api::routes::process_article,
        crate::api::routes::health_check,
        crate::api::routes::get_capabilities,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::ArticleSummary,
        crate::types::SearchResults,
        crate::types::ProcessedArticle,
        crate::types::SearchRequest,
        crate::types::ProcessRequest,
        crate::types::Capabilities,
        crate::error::ApiError,
    )),
    tags(
        (name = "articles", description = "Search for news and process individual articles"),
        (name = "system", description = "Health, limits and API documentation")
    )
)]
pub struct ApiDoc;
