//! REST API server module
//!
//! Exposes the gateway over HTTP: keyword search, article processing and a
//! few system endpoints, documented with an OpenAPI specification.

use crate::{Config, Gateway, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Articles
/// - `POST /search_news` - Keyword search, `{query}` → `{count, articles}`
/// - `POST /process_article` - Summarize/translate, `{url}` → processed article
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /capabilities` - Worker and search limits
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(gateway: Arc<Gateway>, config: Arc<Config>) -> Router {
    let state = AppState::new(gateway, config.clone());

    let router = Router::new()
        // Articles
        .route("/search_news", post(routes::search_news))
        .route("/process_article", post(routes::process_article))
        // System
        .route("/health", get(routes::health_check))
        .route("/capabilities", get(routes::get_capabilities))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config (outermost)
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin; otherwise only the listed
/// origins are allowed. All methods and headers are permitted.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until SIGINT/SIGTERM, then stops accepting connections and lets
/// in-flight requests finish.
///
/// # Example
///
/// ```no_run
/// use newsdesk::{Config, Gateway};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let gateway = Arc::new(Gateway::from_config(&config)?);
///
/// // Blocks until shutdown
/// newsdesk::api::start_api_server(gateway, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(gateway: Arc<Gateway>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    serve_with_listener(listener, gateway, config, crate::shutdown_signal()).await
}

/// Serve the API on an already-bound listener until `shutdown` completes
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    gateway: Arc<Gateway>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().map_err(crate::error::Error::Io)?;
    let app = create_router(gateway, config);

    tracing::info!(address = %address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
