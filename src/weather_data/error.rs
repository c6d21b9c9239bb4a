use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    // Final status after retries; the preview is the first 400 chars of the body.
    #[error("HTTP {status} for {url}: {body_preview}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body_preview: String,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to parse CSV response")]
    CsvParse(#[source] PolarsError),

    #[error("Expected column(s) missing: {missing:?} | received: {present:?}")]
    MissingColumns {
        missing: Vec<String>,
        present: Vec<String>,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// HTTP status of the failed request, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::NetworkRequest(_, e) | FetchError::BodyRead(_, e) => e.status(),
            _ => None,
        }
    }
}
