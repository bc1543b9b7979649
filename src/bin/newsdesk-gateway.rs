//! newsdesk gateway server
//!
//! Loads an optional JSON config file, overlays command-line flags and
//! environment variables (a `.env` file is honored), then serves the API
//! until SIGINT/SIGTERM.

use clap::Parser;
use newsdesk::{Config, Gateway};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "newsdesk-gateway", version, about = "News search and article processing gateway")]
struct Cli {
    /// JSON configuration file; flags and environment override its values
    #[arg(long, env = "NEWSDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "NEWSDESK_BIND")]
    bind: Option<SocketAddr>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,

    /// Search provider base URL
    #[arg(long, env = "NEWS_API_URL")]
    news_api_url: Option<String>,

    /// Worker program (default: python3 on PATH)
    #[arg(long, env = "NEWSDESK_WORKER_PROGRAM")]
    worker_program: Option<PathBuf>,

    /// Worker arguments, comma separated (default: nlp_service.py)
    #[arg(long, env = "NEWSDESK_WORKER_ARGS", value_delimiter = ',')]
    worker_args: Option<Vec<String>>,

    /// Working directory for the worker
    #[arg(long, env = "NEWSDESK_WORKER_DIR")]
    worker_dir: Option<PathBuf>,

    /// Seconds before a worker run is killed
    #[arg(long, env = "NEWSDESK_WORKER_TIMEOUT")]
    worker_timeout: Option<u64>,

    /// Maximum concurrent worker runs
    #[arg(long, env = "NEWSDESK_MAX_WORKERS")]
    max_workers: Option<usize>,
}

impl Cli {
    fn into_config(self) -> newsdesk::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config.server.api.bind_address = bind;
        }
        if let Some(key) = self.news_api_key {
            config.search.api_key = Some(key);
        }
        if let Some(url) = self.news_api_url {
            config.search.base_url = url;
        }
        if let Some(program) = self.worker_program {
            config.worker.program = Some(program);
        }
        if let Some(args) = self.worker_args {
            config.worker.args = args;
        }
        if let Some(dir) = self.worker_dir {
            config.worker.working_dir = Some(dir);
        }
        if let Some(secs) = self.worker_timeout {
            config.worker.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_workers {
            config.worker.max_concurrent = max;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing();

    let config = Arc::new(cli.into_config()?);
    let gateway = Arc::new(Gateway::from_config(&config)?);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.api.bind_address,
        "newsdesk gateway starting"
    );
    newsdesk::api::start_api_server(gateway, config).await?;
    Ok(())
}
