//! View state of the article controller

use crate::types::{ArticleSummary, DEFAULT_LANGUAGE_KEY, ProcessedArticle};
use std::fmt;

/// Which of the two flows a request or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowScope {
    /// Keyword search
    Search,
    /// Article processing
    Process,
}

impl fmt::Display for FlowScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowScope::Search => f.write_str("search"),
            FlowScope::Process => f.write_str("processing"),
        }
    }
}

/// What is being processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessTarget {
    /// A card picked from the search results
    Article(ArticleSummary),
    /// A URL typed in by the user
    Url(String),
}

impl ProcessTarget {
    /// URL sent to the gateway
    pub fn url(&self) -> &str {
        match self {
            ProcessTarget::Article(article) => &article.url,
            ProcessTarget::Url(url) => url,
        }
    }
}

/// One language tab of a processed article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTab {
    /// `"default"` for the English summary, otherwise the translations key
    pub key: String,
    /// Display label (e.g. "English", "Hindi")
    pub label: String,
}

impl LanguageTab {
    fn english() -> Self {
        Self {
            key: DEFAULT_LANGUAGE_KEY.to_string(),
            label: "English".to_string(),
        }
    }

    fn translation(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: language_label(key),
        }
    }

    /// Voice/language code handed to the speech engine
    pub fn voice(&self) -> String {
        voice_for(&self.key)
    }
}

/// Non-blocking notice about a capability the worker could not deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Summarization failed; nothing downstream exists
    SummaryUnavailable,
    /// An expected translation is missing
    TranslationUnavailable(String),
    /// No video or image was rendered
    MediaUnavailable,
}

impl Advisory {
    /// Text shown to the user
    pub fn message(&self) -> String {
        match self {
            Advisory::SummaryUnavailable => {
                "A summary could not be generated for this article.".to_string()
            }
            Advisory::TranslationUnavailable(language) => {
                format!("{} translation is unavailable.", language_label(language))
            }
            Advisory::MediaUnavailable => "No video or image was generated for this article.".to_string(),
        }
    }
}

/// A processed article with its tabs and advisories
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedView {
    /// Worker result
    pub article: ProcessedArticle,
    /// English first, then one tab per translation present
    pub tabs: Vec<LanguageTab>,
    /// Index into `tabs`
    pub active: usize,
    /// Partial-capability notices
    pub advisories: Vec<Advisory>,
}

impl ProcessedView {
    pub(crate) fn new(article: ProcessedArticle, expected_languages: &[String]) -> Self {
        let mut tabs = vec![LanguageTab::english()];
        tabs.extend(article.translations.keys().map(|key| LanguageTab::translation(key)));

        let advisories = advisories_for(&article, expected_languages);
        Self {
            article,
            tabs,
            active: 0,
            advisories,
        }
    }

    /// Currently selected tab
    pub fn active_tab(&self) -> &LanguageTab {
        // `tabs` always holds the English tab and `active` only moves through `select`
        &self.tabs[self.active]
    }

    /// Text displayed (and narrated) for the selected tab
    pub fn active_text(&self) -> Option<&str> {
        self.article.text_for(&self.active_tab().key)
    }

    /// Labels of all tabs, in display order
    pub fn tab_labels(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.label.as_str()).collect()
    }

    pub(crate) fn select(&mut self, key: &str) -> bool {
        let found = self
            .tabs
            .iter()
            .position(|tab| tab.key == key || tab.label.eq_ignore_ascii_case(key));
        if let Some(index) = found {
            self.active = index;
        }
        found.is_some()
    }
}

/// The single visible state of the result area
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing submitted yet
    Idle,
    /// A search is in flight
    Searching {
        /// Submitted query
        query: String,
    },
    /// A search returned articles
    SearchResults {
        /// Submitted query
        query: String,
        /// Result cards in provider order
        articles: Vec<ArticleSummary>,
        /// e.g. "Found 3 articles."
        message: String,
    },
    /// A search returned nothing usable
    NoResults {
        /// Submitted query
        query: String,
        /// e.g. `No articles found for "ai".`
        message: String,
    },
    /// An article is being processed
    Processing {
        /// What is being processed
        target: ProcessTarget,
    },
    /// An article was processed
    Processed(ProcessedView),
    /// The last request failed
    Failed {
        /// Message shown to the user
        reason: String,
        /// Which flow failed
        scope: FlowScope,
    },
}

impl ViewState {
    /// Status message for the result area, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::SearchResults { message, .. } | ViewState::NoResults { message, .. } => {
                Some(message)
            }
            ViewState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// True while a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Searching { .. } | ViewState::Processing { .. })
    }
}

/// Status line after a successful search
pub fn results_message(count: usize) -> String {
    match count {
        1 => "Found 1 article.".to_string(),
        n => format!("Found {n} articles."),
    }
}

/// Status line after a search with no usable results
pub fn no_results_message(query: &str) -> String {
    format!("No articles found for \"{query}\".")
}

fn advisories_for(article: &ProcessedArticle, expected_languages: &[String]) -> Vec<Advisory> {
    if !article.has_summary() {
        return vec![Advisory::SummaryUnavailable];
    }

    let mut advisories: Vec<Advisory> = expected_languages
        .iter()
        .filter(|language| article.text_for(language).is_none())
        .map(|language| Advisory::TranslationUnavailable(language.clone()))
        .collect();
    if article.media_artifacts.is_empty() {
        advisories.push(Advisory::MediaUnavailable);
    }
    advisories
}

fn language_label(key: &str) -> String {
    match key {
        "en" => "English".to_string(),
        "hi" => "Hindi".to_string(),
        "mr" => "Marathi".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn voice_for(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "default" | "english" => "en".to_string(),
        "hindi" => "hi".to_string(),
        "marathi" => "mr".to_string(),
        other => other.to_string(),
    }
}
