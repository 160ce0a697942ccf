//! Retrieval of the destination dataset.
//!
//! The dataset is a JSON array of [`TravelEntry`] objects, read either over
//! HTTP or from a local file. Every call fetches it fresh; nothing is cached
//! between submissions and no request is retried.

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::DatasetConfig;
use crate::domain::TravelEntry;

/// Why a dataset retrieval failed.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Dataset endpoint {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset from {origin}: {message}")]
    Malformed { origin: String, message: String },

    #[error("Invalid HTTP client settings for {url}: {source}")]
    Client {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Capability to fetch the full, ordered dataset.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches every entry in source order.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] on transport failure, a non-success
    /// status, an unreadable file or a payload that is not a JSON array of
    /// entries.
    async fn fetch(&self) -> Result<Vec<TravelEntry>, DatasetError>;

    /// Human readable location of the dataset, for logs.
    fn describe(&self) -> String;
}

fn parse_entries(origin: &str, bytes: &[u8]) -> Result<Vec<TravelEntry>, DatasetError> {
    serde_json::from_slice(bytes).map_err(|e| DatasetError::Malformed {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

/// Fetches the dataset with a GET request.
#[derive(Clone)]
pub struct HttpDataSource {
    client: Client,
    url: String,
}

impl HttpDataSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, Client::new())
    }

    #[must_use]
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Builds a client honoring the configured user agent and timeout.
    ///
    /// A timeout of zero leaves the request unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Client`] if the user agent is not a valid
    /// header value or the client cannot be built.
    pub fn from_config(
        url: impl Into<String>,
        config: &DatasetConfig,
    ) -> Result<Self, DatasetError> {
        let url = url.into();

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }

        let client = builder.build().map_err(|source| DatasetError::Client {
            url: url.clone(),
            source,
        })?;

        Ok(Self::with_client(url, client))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<TravelEntry>, DatasetError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| DatasetError::Transport {
                url: self.url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DatasetError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DatasetError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let entries = parse_entries(&self.url, &body)?;

        metrics::histogram!("tripfinder_dataset_fetch_duration_seconds", "source" => "http")
            .record(start.elapsed().as_secs_f64());
        debug!(count = entries.len(), "Fetched dataset");

        Ok(entries)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the dataset from disk.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    path: PathBuf,
}

impl FileDataSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<TravelEntry>, DatasetError> {
        let start = Instant::now();
        let origin = self.path.display().to_string();

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DatasetError::Io {
                path: origin.clone(),
                source,
            })?;

        let entries = parse_entries(&origin, &bytes)?;

        metrics::histogram!("tripfinder_dataset_fetch_duration_seconds", "source" => "file")
            .record(start.elapsed().as_secs_f64());
        debug!(count = entries.len(), "Read dataset");

        Ok(entries)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a fixed, already loaded list of entries.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    entries: Vec<TravelEntry>,
}

impl StaticDataSource {
    #[must_use]
    pub const fn new(entries: Vec<TravelEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch(&self) -> Result<Vec<TravelEntry>, DatasetError> {
        Ok(self.entries.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} entries)", self.entries.len())
    }
}

/// Picks the source implementation for a configured location.
///
/// `http://` and `https://` locations are fetched over the network, anything
/// else is treated as a file path.
///
/// # Errors
///
/// Fails when the HTTP client cannot be built from `config`.
pub fn source_for(
    location: &str,
    config: &DatasetConfig,
) -> Result<std::sync::Arc<dyn DataSource>, DatasetError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(std::sync::Arc::new(HttpDataSource::from_config(
            location, config,
        )?))
    } else {
        Ok(std::sync::Arc::new(FileDataSource::new(location)))
    }
}
