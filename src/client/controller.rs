//! Article controller: the search and process flows as one state machine

use super::error::{ClientError, ControlError};
use super::http::GatewayApi;
use super::speech::{SpeechOutput, Utterance};
use super::state::{
    FlowScope, ProcessTarget, ProcessedView, ViewState, no_results_message, results_message,
};
use crate::types::{ArticleSummary, ProcessedArticle, SearchResults};

/// Languages the worker is expected to translate into
pub const DEFAULT_EXPECTED_LANGUAGES: [&str; 2] = ["hindi", "marathi"];

/// Handle for one in-flight request
///
/// Only the response to the most recent request is applied; completing with
/// an older ticket is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    scope: FlowScope,
}

impl RequestTicket {
    /// Flow this request belongs to
    pub fn scope(&self) -> FlowScope {
        self.scope
    }
}

/// Which controls accept input right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// The search submit control
    pub search_enabled: bool,
    /// The process (card selection / URL submit) control
    pub process_enabled: bool,
}

/// Drives the visible result area
///
/// Holds exactly one [`ViewState`]. The two flows share it: starting one
/// supersedes the other, and the control of a flow is disabled while that
/// flow is in flight. Network work happens between a `begin_*` call, which
/// returns a [`RequestTicket`], and the matching `complete_*` call; the async
/// [`search`](Self::search), [`process_selected`](Self::process_selected) and
/// [`process_url`](Self::process_url) helpers do both around a [`GatewayApi`];
/// dropping one of their futures abandons the request as
/// [`cancel_in_flight`](Self::cancel_in_flight) does.
///
/// Narration started through [`play_narration`](Self::play_narration) is
/// stopped when a new flow starts, when a tab is selected, and when the
/// controller is dropped.
pub struct ArticleController<S: SpeechOutput> {
    state: ViewState,
    last_results: Option<(String, Vec<ArticleSummary>)>,
    in_flight: Option<RequestTicket>,
    next_ticket: u64,
    expected_languages: Vec<String>,
    speech: S,
}

impl<S: SpeechOutput> ArticleController<S> {
    /// Create an idle controller narrating through `speech`
    pub fn new(speech: S) -> Self {
        Self {
            state: ViewState::Idle,
            last_results: None,
            in_flight: None,
            next_ticket: 0,
            expected_languages: DEFAULT_EXPECTED_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
            speech,
        }
    }

    /// Override which missing translations produce advisories
    pub fn with_expected_languages(mut self, languages: Vec<String>) -> Self {
        self.expected_languages = languages;
        self
    }

    /// The visible state
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Speech engine in use
    pub fn speech(&self) -> &S {
        &self.speech
    }

    /// Enablement of the two triggering controls
    pub fn controls(&self) -> Controls {
        let busy = |scope: FlowScope| self.in_flight.is_some_and(|t| t.scope == scope);
        Controls {
            search_enabled: !busy(FlowScope::Search),
            process_enabled: !busy(FlowScope::Process),
        }
    }

    /// Start a search
    ///
    /// Explicit submit, Enter and picking a category all land here.
    pub fn begin_search(&mut self, query: &str) -> Result<RequestTicket, ControlError> {
        if !self.controls().search_enabled {
            return Err(ControlError::Busy(FlowScope::Search));
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(ControlError::InvalidInput(
                "Please enter a search term.".to_string(),
            ));
        }

        self.stop_narration();
        self.last_results = None;
        self.state = ViewState::Searching {
            query: query.to_string(),
        };
        Ok(self.issue_ticket(FlowScope::Search))
    }

    /// Apply the outcome of a search; returns false if `ticket` is stale
    pub fn complete_search(
        &mut self,
        ticket: RequestTicket,
        result: Result<SearchResults, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        let query = match &self.state {
            ViewState::Searching { query } => query.clone(),
            _ => String::new(),
        };

        self.state = match result {
            Ok(results) if results.is_empty() => {
                self.last_results = None;
                ViewState::NoResults {
                    message: no_results_message(&query),
                    query,
                }
            }
            Ok(results) => {
                self.last_results = Some((query.clone(), results.articles.clone()));
                ViewState::SearchResults {
                    message: results_message(results.articles.len()),
                    query,
                    articles: results.articles,
                }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search failed");
                self.last_results = None;
                ViewState::Failed {
                    reason: e.to_string(),
                    scope: FlowScope::Search,
                }
            }
        };
        true
    }

    /// Start processing the search result card at `index`
    pub fn begin_process_selected(&mut self, index: usize) -> Result<RequestTicket, ControlError> {
        if !self.controls().process_enabled {
            return Err(ControlError::Busy(FlowScope::Process));
        }
        let ViewState::SearchResults { articles, .. } = &self.state else {
            return Err(ControlError::NoSuchArticle { index });
        };
        let article = articles
            .get(index)
            .cloned()
            .ok_or(ControlError::NoSuchArticle { index })?;

        Ok(self.start_processing(ProcessTarget::Article(article)))
    }

    /// Start processing a URL typed in by the user
    pub fn begin_process_url(&mut self, url: &str) -> Result<RequestTicket, ControlError> {
        if !self.controls().process_enabled {
            return Err(ControlError::Busy(FlowScope::Process));
        }
        let url = match crate::gateway::validate_article_url(url) {
            Ok(url) => url,
            Err(e) => {
                // A rejected attempt still replaces whatever article was shown
                self.stop_narration();
                if let Some(previous) = self.in_flight.take() {
                    tracing::debug!(superseded = %previous.scope, "request superseded by invalid url");
                }
                self.state = ViewState::Failed {
                    reason: e.to_string(),
                    scope: FlowScope::Process,
                };
                return Err(ControlError::InvalidInput(e.to_string()));
            }
        };

        Ok(self.start_processing(ProcessTarget::Url(url.to_string())))
    }

    /// Apply the outcome of processing; returns false if `ticket` is stale
    pub fn complete_process(
        &mut self,
        ticket: RequestTicket,
        result: Result<ProcessedArticle, ClientError>,
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }

        self.state = match result {
            Ok(article) => ViewState::Processed(ProcessedView::new(article, &self.expected_languages)),
            Err(e) => {
                tracing::warn!(error = %e, code = ?e.code(), "article processing failed");
                ViewState::Failed {
                    reason: e.to_string(),
                    scope: FlowScope::Process,
                }
            }
        };
        true
    }

    /// Submit a search and wait for it
    pub async fn search<G>(&mut self, gateway: &G, query: &str) -> Result<&ViewState, ControlError>
    where
        G: GatewayApi + ?Sized,
    {
        let ticket = self.begin_search(query)?;
        let pending = PendingRequest::new(self, ticket);
        let result = gateway.search(query.trim()).await;
        pending.finish(|controller| controller.complete_search(ticket, result));
        Ok(&self.state)
    }

    /// Process the card at `index` and wait for it
    pub async fn process_selected<G>(
        &mut self,
        gateway: &G,
        index: usize,
    ) -> Result<&ViewState, ControlError>
    where
        G: GatewayApi + ?Sized,
    {
        let ticket = self.begin_process_selected(index)?;
        self.run_process(gateway, ticket).await;
        Ok(&self.state)
    }

    /// Process a typed-in URL and wait for it
    pub async fn process_url<G>(&mut self, gateway: &G, url: &str) -> Result<&ViewState, ControlError>
    where
        G: GatewayApi + ?Sized,
    {
        let ticket = self.begin_process_url(url)?;
        self.run_process(gateway, ticket).await;
        Ok(&self.state)
    }

    /// Switch the displayed language; never contacts the gateway
    pub fn select_tab(&mut self, key: &str) -> Result<(), ControlError> {
        let ViewState::Processed(view) = &mut self.state else {
            return Err(ControlError::NothingProcessed);
        };
        if !view.select(key) {
            return Err(ControlError::NoSuchTab(key.to_string()));
        }
        self.speech.cancel();
        Ok(())
    }

    /// Read the selected tab's text aloud
    pub fn play_narration(&mut self) -> Result<(), ControlError> {
        let ViewState::Processed(view) = &self.state else {
            return Err(ControlError::NothingProcessed);
        };
        let text = view.active_text().ok_or(ControlError::NothingToNarrate)?;
        let utterance = Utterance {
            text: text.to_string(),
            language: view.active_tab().voice(),
        };
        self.speech.speak(&utterance)?;
        Ok(())
    }

    /// Stop narration in progress
    pub fn stop_narration(&mut self) {
        self.speech.cancel();
    }

    /// Abandon the in-flight request, if any
    ///
    /// A pending search returns to idle. A pending process request returns to
    /// the remembered result list, or to idle when there is none. A response
    /// that arrives later is discarded. Returns false when nothing was in flight.
    pub fn cancel_in_flight(&mut self) -> bool {
        let Some(ticket) = self.in_flight.take() else {
            return false;
        };
        tracing::debug!(scope = %ticket.scope, "in-flight request cancelled");

        if matches!(
            self.state,
            ViewState::Searching { .. } | ViewState::Processing { .. }
        ) {
            self.state = match self.last_results.clone() {
                Some((query, articles)) if ticket.scope == FlowScope::Process => {
                    ViewState::SearchResults {
                        message: results_message(articles.len()),
                        query,
                        articles,
                    }
                }
                _ => ViewState::Idle,
            };
        }
        true
    }

    /// Return from a processed (or failed) article to the remembered result list
    pub fn back_to_results(&mut self) -> Result<(), ControlError> {
        let Some((query, articles)) = self.last_results.clone() else {
            return Err(ControlError::NoEarlierResults);
        };
        self.stop_narration();
        // Leaving supersedes a pending process request
        self.in_flight = None;
        self.state = ViewState::SearchResults {
            message: results_message(articles.len()),
            query,
            articles,
        };
        Ok(())
    }

    async fn run_process<G>(&mut self, gateway: &G, ticket: RequestTicket)
    where
        G: GatewayApi + ?Sized,
    {
        let url = match &self.state {
            ViewState::Processing { target } => target.url().to_string(),
            _ => return,
        };
        let pending = PendingRequest::new(self, ticket);
        let result = gateway.process(&url).await;
        pending.finish(|controller| controller.complete_process(ticket, result));
    }

    fn start_processing(&mut self, target: ProcessTarget) -> RequestTicket {
        self.stop_narration();
        self.state = ViewState::Processing { target };
        self.issue_ticket(FlowScope::Process)
    }

    fn issue_ticket(&mut self, scope: FlowScope) -> RequestTicket {
        self.next_ticket += 1;
        let ticket = RequestTicket {
            id: self.next_ticket,
            scope,
        };
        if let Some(previous) = self.in_flight.replace(ticket) {
            tracing::debug!(superseded = %previous.scope, by = %scope, "request superseded");
        }
        ticket
    }

    fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(scope = %ticket.scope, "discarding stale response");
            return false;
        }
        self.in_flight = None;
        true
    }
}

/// Cancels its request when the awaiting future is dropped before completion
struct PendingRequest<'a, S: SpeechOutput> {
    controller: &'a mut ArticleController<S>,
    ticket: RequestTicket,
    finished: bool,
}

impl<'a, S: SpeechOutput> PendingRequest<'a, S> {
    fn new(controller: &'a mut ArticleController<S>, ticket: RequestTicket) -> Self {
        Self {
            controller,
            ticket,
            finished: false,
        }
    }

    fn finish(mut self, complete: impl FnOnce(&mut ArticleController<S>) -> bool) {
        self.finished = true;
        complete(&mut *self.controller);
    }
}

impl<S: SpeechOutput> Drop for PendingRequest<'_, S> {
    fn drop(&mut self) {
        if !self.finished && self.controller.in_flight == Some(self.ticket) {
            self.controller.cancel_in_flight();
        }
    }
}

impl<S: SpeechOutput> Drop for ArticleController<S> {
    fn drop(&mut self) {
        self.speech.cancel();
    }
}
