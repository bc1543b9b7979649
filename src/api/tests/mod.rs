use super::*;
use crate::config::SearchConfig;
use crate::error::ApiError;
use crate::search::NewsApiProvider;
use crate::test_helpers::{FakeWorker, provider_article, provider_response, shell_worker};
use crate::worker::{BoundedWorker, ContentWorker};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_router(search_uri: String, worker: Arc<dyn ContentWorker>) -> Router {
    let config = Arc::new(Config {
        search: SearchConfig {
            base_url: search_uri,
            api_key: Some("test-key".into()),
            ..Default::default()
        },
        ..Default::default()
    });
    let search = NewsApiProvider::new(&config.search).unwrap();
    let gateway = Arc::new(Gateway::new(Arc::new(search), worker));
    create_router(gateway, config)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn error_body(response: Response) -> ApiError {
    serde_json::from_value(json_body(response).await).unwrap()
}

#[tokio::test]
async fn search_returns_envelope_of_complete_articles() {
    let server = MockServer::start().await;
    let mut incomplete = provider_article("Four", "d", "https://news.example/4");
    incomplete["description"] = serde_json::Value::Null;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_response(vec![
            provider_article("One", "a", "https://news.example/1"),
            incomplete,
            provider_article("Two", "b", "https://news.example/2"),
            provider_article("Three", "c", "https://news.example/3"),
        ])))
        .mount(&server)
        .await;
    let app = test_router(server.uri(), Arc::new(FakeWorker::succeeding("s")));

    let response = app
        .oneshot(post_json("/search_news", r#"{"query": "artificial intelligence"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 3);
    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 3);
    for article in articles {
        for field in ["title", "description", "url", "source"] {
            assert!(!article[field].as_str().unwrap().is_empty());
        }
    }
    assert_eq!(articles[0]["publishedAt"], "2024-05-01T10:00:00Z");
}

#[tokio::test]
async fn empty_or_missing_query_is_400_without_provider_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_response(vec![])))
        .expect(0)
        .mount(&server)
        .await;
    let app = test_router(server.uri(), Arc::new(FakeWorker::succeeding("s")));

    for body in [r#"{"query": ""}"#, r#"{"query": "   "}"#, "{}"] {
        let response = app.clone().oneshot(post_json("/search_news", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(error_body(response).await.code, "validation_error");
    }
}

#[tokio::test]
async fn malformed_json_body_is_400() {
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(FakeWorker::succeeding("s")));

    for uri in ["/search_news", "/process_article"] {
        let response = app
            .clone()
            .oneshot(post_json(uri, r#"{"query": "#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let api_error = error_body(response).await;
        assert_eq!(api_error.code, "validation_error");
        assert!(api_error.error.starts_with("invalid JSON request body"));
    }
}

#[tokio::test]
async fn provider_failure_is_500_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "code": "apiKeyMissing",
            "message": "Your API key is missing."
        })))
        .mount(&server)
        .await;
    let app = test_router(server.uri(), Arc::new(FakeWorker::succeeding("s")));

    let response = app
        .oneshot(post_json("/search_news", r#"{"query": "ai"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let api_error = error_body(response).await;
    assert_eq!(api_error.code, "provider_error");
    let details = api_error.details.unwrap();
    assert_eq!(details["provider_status"], 401);
    assert_eq!(details["provider_message"], "Your API key is missing.");
}

#[tokio::test]
async fn process_returns_worker_document() {
    let app = test_router(
        "http://127.0.0.1:9".into(),
        Arc::new(FakeWorker::succeeding("Markets rallied.")),
    );

    let response = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["summary"], "Markets rallied.");
    assert_eq!(body["translations"]["hindi"], "[hi] Markets rallied.");
    assert_eq!(body["mediaArtifacts"], serde_json::json!({}));
}

#[tokio::test]
async fn missing_or_malformed_url_is_400_and_worker_untouched() {
    let worker = FakeWorker::succeeding("s");
    let calls = worker.call_counter();
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(worker));

    for body in ["{}", r#"{"url": "notaurl"}"#, r#"{"url": "ftp://x.example/a"}"#] {
        let response = app
            .clone()
            .oneshot(post_json("/process_article", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn worker_error_message_is_returned_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let worker = shell_worker(
        dir.path(),
        "cat > /dev/null\necho '{\"error\": \"network timeout\"}' >&2\nexit 1",
    );
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(worker));

    let response = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let api_error = error_body(response).await;
    assert_eq!(api_error.error, "network timeout");
    assert_eq!(api_error.code, "worker_failed");
}

#[tokio::test]
async fn non_json_worker_output_is_not_forwarded() {
    let dir = tempfile::tempdir().unwrap();
    let worker = shell_worker(dir.path(), "cat > /dev/null\nprintf 'not-json'");
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(worker));

    let response = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], "worker_output_invalid");
    assert!(!body.to_string().contains("not-json"));
}

#[tokio::test]
async fn empty_summary_is_a_success_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let worker = shell_worker(
        dir.path(),
        r#"cat > /dev/null
printf '%s' '{"summary": "", "translations": {}}'"#,
    );
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(worker));

    let response = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["summary"], "");
    assert_eq!(body["translations"], serde_json::json!({}));
}

#[tokio::test]
async fn timed_out_worker_is_500_worker_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let worker = shell_worker(dir.path(), "cat > /dev/null\nsleep 5");
    let bounded = BoundedWorker::new(worker, 1, Duration::from_millis(200));
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(bounded));

    let response = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await.code, "worker_timeout");
}

#[tokio::test]
async fn excess_process_requests_get_503_with_retry_after() {
    let fake = FakeWorker::blocking();
    let release = fake.release_handle();
    let calls = fake.call_counter();
    let bounded = BoundedWorker::new(fake, 1, Duration::from_secs(10));
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(bounded));

    let first = tokio::spawn({
        let app = app.clone();
        async move {
            app.oneshot(post_json("/process_article", r#"{"url": "https://news.example/1"}"#))
                .await
                .unwrap()
        }
    });
    while calls.load(std::sync::atomic::Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let rejected = app
        .oneshot(post_json("/process_article", r#"{"url": "https://news.example/2"}"#))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(rejected.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(error_body(rejected).await.code, "capacity_exceeded");

    release.notify_one();
    assert_eq!(first.await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn health_and_capabilities() {
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(FakeWorker::succeeding("s")));

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body = json_body(health).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let caps = app
        .clone()
        .oneshot(Request::get("/capabilities").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(caps).await;
    assert_eq!(body["worker"], "fake");
    assert_eq!(body["search_page_size"], 20);
    assert_eq!(body["worker_timeout_secs"], 120);

    let spec = app
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(spec.status(), StatusCode::OK);
    assert!(json_body(spec).await["paths"]["/process_article"].is_object());
}

#[tokio::test]
async fn cors_allows_configured_origins() {
    let app = test_router("http://127.0.0.1:9".into(), Arc::new(FakeWorker::succeeding("s")));
    let request = Request::get("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn cors_can_be_restricted_or_disabled() {
    let search = NewsApiProvider::new(&SearchConfig::default()).unwrap();
    let gateway = Arc::new(Gateway::new(
        Arc::new(search),
        Arc::new(FakeWorker::succeeding("s")),
    ));

    let mut restricted = Config::default();
    restricted.server.api.cors_origins = vec!["https://desk.example".into()];
    let app = create_router(gateway.clone(), Arc::new(restricted));
    let response = app
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "https://desk.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://desk.example"
    );

    let mut disabled = Config::default();
    disabled.server.api.cors_enabled = false;
    let app = create_router(gateway, Arc::new(disabled));
    let response = app
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "https://desk.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn server_stops_on_shutdown_signal() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let search = NewsApiProvider::new(&SearchConfig::default()).unwrap();
    let gateway = Arc::new(Gateway::new(
        Arc::new(search),
        Arc::new(FakeWorker::succeeding("s")),
    ));
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve_with_listener(
        listener,
        gateway,
        Arc::new(Config::default()),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let health: serde_json::Value = reqwest::get(format!("http://{address}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
