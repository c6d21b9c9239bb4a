use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to create temporary file next to '{0}'")]
    TempFile(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing CSV file '{0}'")]
    Encode(PathBuf, #[source] PolarsError),

    #[error("Failed to move finished file into place at '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
