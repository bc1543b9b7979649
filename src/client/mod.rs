//! Client side of the news desk
//!
//! Everything a front end needs besides rendering:
//!
//! - [`GatewayClient`]: HTTP client for `/search_news` and `/process_article`
//! - [`ArticleController`]: the search and process flows as one state
//!   machine over a single visible [`ViewState`], with per-language tabs,
//!   advisories for missing translations/media, and narration control
//! - [`SpeechOutput`]: local text-to-speech, with [`CommandSpeech`]
//!   (`espeak-ng`) and [`NoSpeech`]
//!
//! ## Usage
//!
//! ```no_run
//! use newsdesk::client::{ArticleController, GatewayClient, NoSpeech, ViewState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GatewayClient::new("http://127.0.0.1:5000")?;
//!     let mut controller = ArticleController::new(NoSpeech);
//!
//!     controller.search(&gateway, "monsoon").await?;
//!     if let ViewState::SearchResults { message, .. } = controller.state() {
//!         println!("{message}");
//!         controller.process_selected(&gateway, 0).await?;
//!     }
//!     Ok(())
//! }
//! ```

mod controller;
mod error;
mod http;
mod speech;
mod state;

pub use controller::{ArticleController, Controls, DEFAULT_EXPECTED_LANGUAGES, RequestTicket};
pub use error::{ClientError, ControlError, SpeechError};
pub use http::{GatewayApi, GatewayClient};
pub use speech::{CommandSpeech, NoSpeech, SpeechOutput, Utterance};
pub use state::{
    Advisory, FlowScope, LanguageTab, ProcessTarget, ProcessedView, ViewState, no_results_message,
    results_message,
};
