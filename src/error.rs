//! Error types for wandb-logger
//!
//! Only the construction path and the bundled clients use this enum.
//! Errors raised by a tracking client's session reach the caller as the
//! client's own error type.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// wandb-logger error types
#[derive(Error, Debug)]
pub enum Error {
    /// The tracking client cannot be used in this environment
    #[error(
        "You want to use the `{client}` logger which is not available yet.\n\
         Enable the `{client}` feature of wandb-logger or install the tracking backend."
    )]
    DependencyMissing {
        /// Name of the unavailable client
        client: String,
    },

    /// A run with this id already exists and the resume policy forbids reuse
    #[error("Run already exists: {0}\nPass `resume = \"allow\"` to continue it.")]
    RunExists(String),

    /// The resume policy requires an existing run but none was found
    #[error("Run not found: {0}\nCannot resume a run that was never created.")]
    RunNotFound(String),

    /// The run id cannot be used as a single path segment
    #[error(
        "Invalid run id: {0:?}\n\
         Run ids must be non-empty and must not contain path separators or `..`."
    )]
    InvalidRunId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a [`Error::DependencyMissing`] for the named client.
    #[must_use]
    pub fn dependency_missing(client: impl Into<String>) -> Self {
        Self::DependencyMissing {
            client: client.into(),
        }
    }
}
