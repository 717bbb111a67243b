//! History provider trait and structured error types.
//!
//! A `HistoryProvider` hands back the raw text of the price table. The
//! CSV parsing and caching layers sit above it, so providers can be
//! swapped (local file, HTTP) and mocked in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Structured error types for history loading.
///
/// These never reach dashboard consumers: the store turns them into an
/// empty history. They are exposed so the CLI and tests can report why.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("history resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("history parse failure: {0}")]
    ParseFailure(String),
}

/// Where the price table lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HistorySource {
    File(PathBuf),
    Url(String),
}

impl HistorySource {
    /// `http://` and `https://` locations are URLs, anything else a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            HistorySource::Url(location.to_string())
        } else {
            HistorySource::File(PathBuf::from(location))
        }
    }
}

impl From<String> for HistorySource {
    fn from(location: String) -> Self {
        Self::parse(&location)
    }
}

impl From<HistorySource> for String {
    fn from(source: HistorySource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for HistorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistorySource::File(path) => write!(f, "{}", path.display()),
            HistorySource::Url(url) => f.write_str(url),
        }
    }
}

impl Default for HistorySource {
    fn default() -> Self {
        HistorySource::File(PathBuf::from("btc-price.csv"))
    }
}

/// Trait for price-table providers.
pub trait HistoryProvider: Send + Sync {
    /// Human-readable description of the resource.
    fn name(&self) -> &str;

    /// Fetch the full text of the price table.
    fn fetch_text(&self) -> Result<String, DataError>;
}

/// Reads the table from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
    name: String,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl HistoryProvider for FileHistory {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_text(&self) -> Result<String, DataError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| DataError::ResourceUnavailable(format!("{}: {e}", self.name)))
    }
}

/// Downloads the table over HTTP with a request timeout, so a stalled
/// server resolves to an error instead of hanging the caller.
pub struct HttpHistory {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpHistory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ResourceUnavailable(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl HistoryProvider for HttpHistory {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch_text(&self) -> Result<String, DataError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::ResourceUnavailable(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::ResourceUnavailable(format!(
                "{}: HTTP {status}",
                self.url
            )));
        }

        resp.text()
            .map_err(|e| DataError::ParseFailure(format!("{}: body is not text: {e}", self.url)))
    }
}

/// Build the provider for a configured source.
pub fn provider_for(
    source: &HistorySource,
    timeout: Duration,
) -> Result<Box<dyn HistoryProvider>, DataError> {
    Ok(match source {
        HistorySource::File(path) => Box::new(FileHistory::new(path.clone())),
        HistorySource::Url(url) => Box::new(HttpHistory::new(url.clone(), timeout)?),
    })
}
