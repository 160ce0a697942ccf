//! Domain types for destination search.
//!
//! The dataset is owned by an external source and never mutated here; these
//! types only describe what a single submission reads and produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One record of the destination dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEntry {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

impl TravelEntry {
    /// Case-insensitive substring test against the entry name.
    ///
    /// `query` must already be normalized (see [`SearchQuery`]).
    #[must_use]
    pub fn matches(&self, query: &SearchQuery) -> bool {
        self.name.to_lowercase().contains(query.as_str())
    }
}

/// A query as typed into the search form, after trimming and case-folding.
///
/// # Examples
///
/// ```rust
/// use tripfinder::domain::SearchQuery;
///
/// let query = SearchQuery::normalize("  Jeju  ");
/// assert_eq!(query.as_str(), "jeju");
/// assert!(SearchQuery::normalize("   ").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a successful match does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Navigate to the first match.
    #[default]
    Redirect,
    /// Hand back every match in dataset order.
    List,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redirect" => Ok(Self::Redirect),
            "list" => Ok(Self::List),
            other => Err(format!("unknown search mode '{other}' (expected redirect or list)")),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect => f.write_str("redirect"),
            Self::List => f.write_str("list"),
        }
    }
}

/// Terminal state reached by one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The normalized query was empty; nothing was fetched.
    EmptyQuery,
    /// Navigation was issued to this url.
    Navigated(String),
    /// List mode: every match, in dataset order.
    Results(Vec<TravelEntry>),
    /// The dataset was fetched but nothing matched.
    NoResults,
    /// Retrieval failed, or the match was rejected. Logged only.
    Failed(String),
    /// A newer submission started before this one completed.
    Superseded,
}

impl SubmitOutcome {
    /// Label used for logs and the submissions counter.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::Navigated(_) => "navigated",
            Self::Results(_) => "results",
            Self::NoResults => "no_results",
            Self::Failed(_) => "failed",
            Self::Superseded => "superseded",
        }
    }
}
