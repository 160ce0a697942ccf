//! Handling of a single search-form submission.
//!
//! A submission is normalized, the dataset is fetched once, and the first
//! entry whose name contains the query decides what happens next. Every
//! collaborator (data source, notification, navigation, results view) is
//! injected, so the same flow drives the CLI, the HTTP surface and tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::clients::{DataSource, DatasetError};
use crate::config::SearchConfig;
use crate::domain::{SearchMode, SearchQuery, SubmitOutcome, TravelEntry};
use crate::services::search::{all_matches, first_match};

/// Failures that end a submission without any user-visible effect.
#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("Dataset retrieval failed: {0}")]
    Retrieval(#[from] DatasetError),

    #[error("Refusing to navigate to {url}: scheme '{scheme}' is not allowed")]
    DisallowedUrl { url: String, scheme: String },
}

/// Blocking, user-visible message (an alert on a web page, stderr on a
/// terminal).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Full navigation to a URL taken from the dataset.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Renders the matches of a list-mode submission.
pub trait ResultsView: Send + Sync {
    fn show(&self, entries: &[TravelEntry]);
}

#[derive(Debug, Clone)]
pub struct Messages {
    pub empty_query: String,
    pub no_results: String,
}

impl Default for Messages {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            empty_query: defaults.empty_query_message,
            no_results: defaults.no_results_message,
        }
    }
}

/// Drives submissions from one search form.
///
/// The latest-request-wins guard is per instance: only submissions made
/// through the same `SearchRedirector` supersede each other. The CLI runs a
/// single submission per process and the HTTP surface builds one instance per
/// request (each response is its own page), so there the guard never fires;
/// embedders with a long-lived form should share one instance behind an
/// `Arc`.
pub struct SearchRedirector {
    source: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    results_view: Option<Arc<dyn ResultsView>>,
    mode: SearchMode,
    messages: Messages,
    allowed_schemes: Vec<String>,
    latest: AtomicU64,
}

impl SearchRedirector {
    #[must_use]
    pub fn new(
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            source,
            notifier,
            navigator,
            results_view: None,
            mode: SearchMode::Redirect,
            messages: Messages::default(),
            allowed_schemes: Vec::new(),
            latest: AtomicU64::new(0),
        }
    }

    /// Applies mode, messages and the URL scheme allow-list from config.
    #[must_use]
    pub fn configured(mut self, config: &SearchConfig) -> Self {
        self.mode = config.mode;
        self.messages = Messages {
            empty_query: config.empty_query_message.clone(),
            no_results: config.no_results_message.clone(),
        };
        self.allowed_schemes = config
            .allowed_schemes
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_results_view(mut self, view: Arc<dyn ResultsView>) -> Self {
        self.results_view = Some(view);
        self
    }

    #[must_use]
    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Runs one submission to its terminal state.
    ///
    /// Exactly one side effect happens per call: a notification, a
    /// navigation (or results view in list mode), or an error log entry.
    /// A submission that is overtaken by a newer one while its dataset is in
    /// flight has no side effect at all.
    pub async fn handle_submit(&self, raw_query: &str) -> SubmitOutcome {
        let outcome = self.run(raw_query).await;

        metrics::counter!("tripfinder_submissions_total", "outcome" => outcome.label())
            .increment(1);

        outcome
    }

    async fn run(&self, raw_query: &str) -> SubmitOutcome {
        let query = SearchQuery::normalize(raw_query);

        if query.is_empty() {
            debug!("Empty search query");
            self.notifier.notify(&self.messages.empty_query);
            return SubmitOutcome::EmptyQuery;
        }

        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            event = "search_submitted",
            query = %query,
            sequence,
            source = %self.source.describe(),
            "Searching destinations"
        );

        let fetched = self.source.fetch().await;

        if self.latest.load(Ordering::SeqCst) != sequence {
            debug!(sequence, "Submission superseded by a newer one");
            return SubmitOutcome::Superseded;
        }

        let entries = match fetched {
            Ok(entries) => entries,
            Err(e) => return Self::report(RedirectError::from(e)),
        };

        match self.mode {
            SearchMode::Redirect => match first_match(&entries, &query) {
                Some(entry) => {
                    if let Err(e) = self.check_url(&entry.url) {
                        return Self::report(e);
                    }
                    info!(event = "search_redirect", name = %entry.name, url = %entry.url);
                    self.navigator.navigate(&entry.url);
                    SubmitOutcome::Navigated(entry.url.clone())
                }
                None => self.no_results(&query),
            },
            SearchMode::List => {
                let matches = all_matches(&entries, &query);
                if matches.is_empty() {
                    return self.no_results(&query);
                }
                info!(event = "search_results", count = matches.len());
                if let Some(view) = &self.results_view {
                    view.show(&matches);
                }
                SubmitOutcome::Results(matches)
            }
        }
    }

    fn no_results(&self, query: &SearchQuery) -> SubmitOutcome {
        info!(event = "search_no_results", query = %query);
        self.notifier.notify(&self.messages.no_results);
        SubmitOutcome::NoResults
    }

    fn report(err: RedirectError) -> SubmitOutcome {
        match &err {
            RedirectError::Retrieval(_) => {
                error!(event = "dataset_retrieval_failed", error = %err, "Error fetching travel data");
            }
            RedirectError::DisallowedUrl { .. } => {
                error!(event = "redirect_rejected", error = %err, "Refusing redirect");
            }
        }
        SubmitOutcome::Failed(err.to_string())
    }

    /// Relative URLs always pass; absolute ones need an allowed scheme when
    /// an allow-list is configured.
    fn check_url(&self, target: &str) -> Result<(), RedirectError> {
        if self.allowed_schemes.is_empty() {
            return Ok(());
        }

        match url::Url::parse(target) {
            Ok(parsed) => {
                let scheme = parsed.scheme().to_ascii_lowercase();
                if self.allowed_schemes.contains(&scheme) {
                    Ok(())
                } else {
                    Err(RedirectError::DisallowedUrl {
                        url: target.to_string(),
                        scheme,
                    })
                }
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
            Err(_) => Err(RedirectError::DisallowedUrl {
                url: target.to_string(),
                scheme: String::new(),
            }),
        }
    }
}
