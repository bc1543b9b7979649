//! Start a real gateway server on an ephemeral port

use newsdesk::{Config, Gateway};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running gateway; stops when dropped
pub struct TestServer {
    pub address: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<newsdesk::Result<()>>>,
}

impl TestServer {
    /// Base URL for [`newsdesk::client::GatewayClient`]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Stop accepting connections and wait for the server task
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .expect("server did not stop")
                .expect("server task panicked")
                .expect("server returned an error");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Config pointing search at `provider_uri` and the worker at `sh <worker_args>`
pub fn test_config(provider_uri: String, worker_args: Vec<String>) -> Config {
    let mut config = Config::default();
    config.search.base_url = provider_uri;
    config.search.api_key = Some("integration-key".to_string());
    config.worker.program = Some(PathBuf::from("sh"));
    config.worker.args = worker_args;
    config.worker.timeout = Duration::from_secs(10);
    config
}

/// Build the production gateway from `config` and serve it
pub async fn start_server(config: Config) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let config = Arc::new(config);
    let gateway = Arc::new(Gateway::from_config(&config).unwrap());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(newsdesk::api::serve_with_listener(
        listener,
        gateway,
        config,
        async move {
            let _ = stop_rx.await;
        },
    ));

    TestServer {
        address,
        stop: Some(stop_tx),
        handle: Some(handle),
    }
}
