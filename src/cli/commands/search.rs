use std::sync::Arc;

use crate::cli::{ConsoleNavigator, ConsoleNotifier, ConsoleResults};
use crate::clients::source_for;
use crate::config::Config;
use crate::domain::{SearchMode, SubmitOutcome};
use crate::services::SearchRedirector;

/// Runs one search submission against the configured dataset.
///
/// Retrieval failures are only logged, matching the web page; the returned
/// outcome lets the caller choose an exit status.
pub async fn cmd_search(
    config: &Config,
    query: &str,
    mode: Option<SearchMode>,
    source: Option<&str>,
) -> anyhow::Result<SubmitOutcome> {
    let location = source.unwrap_or(&config.dataset.source);
    let data_source = source_for(location, &config.dataset)?;

    let mut redirector =
        SearchRedirector::new(data_source, Arc::new(ConsoleNotifier), Arc::new(ConsoleNavigator))
            .configured(&config.search)
            .with_results_view(Arc::new(ConsoleResults));

    if let Some(mode) = mode {
        redirector = redirector.with_mode(mode);
    }

    Ok(redirector.handle_submit(query).await)
}
