//! Error types for the workout tracker

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for workout tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort an operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing the local data file failed
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local data file is not a valid workout table
    #[error("malformed workout data: {0}")]
    Csv(#[from] csv::Error),

    /// An entered value is outside its allowed range
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure talking to the remote document store
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Non-fatal problem reported alongside a still-valid result.
#[derive(Error, Debug)]
pub enum SyncWarning {
    #[error("remote storage is not configured; data saved locally only")]
    NotConfigured,

    #[error("could not load data from remote storage: {0}")]
    Fetch(#[source] RemoteError),

    #[error("remote document has no {0} entry")]
    MissingDocument(&'static str),

    #[error("remote data could not be parsed: {0}")]
    Malformed(#[source] csv::Error),

    #[error("could not save data to remote storage: {0}")]
    Push(#[source] RemoteError),

    #[error("could not refresh local backup: {0}")]
    Backup(#[source] Error),
}
