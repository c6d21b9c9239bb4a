use crate::config::ConfigError;
use crate::output::error::WriteError;
use crate::weather_data::error::FetchError;
use polars::error::PolarsError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No API key available and placeholder output is disabled")]
    MissingCredential,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("Failed processing DataFrame: {0}")]
    Frame(#[from] PolarsError),

    #[error("Run was cancelled")]
    Cancelled,

    #[error("Run did not finish within {0:?}")]
    TimedOut(Duration),
}
